//! Policy beneficiary
//!
//! The beneficiary is embedded in the policy and has no lifecycle of its
//! own. The government identifier follows the PAN layout: five letters,
//! four digits, one letter (`ABCDE1234F`).

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

const MAX_NAME_LEN: usize = 100;
const GOVERNMENT_ID_LEN: usize = 10;

/// The person who receives the policy benefit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    name: String,
    government_id: String,
}

impl Beneficiary {
    /// Creates a beneficiary after checking name and identifier format
    ///
    /// The identifier is accepted in any case and stored upper-cased.
    pub fn new(name: impl Into<String>, government_id: impl Into<String>) -> Result<Self, PolicyError> {
        let name = name.into().trim().to_string();
        let government_id = government_id.into().trim().to_ascii_uppercase();

        validate_name(&name)?;
        validate_government_id(&government_id)?;

        Ok(Self { name, government_id })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn government_id(&self) -> &str {
        &self.government_id
    }
}

fn validate_name(name: &str) -> Result<(), PolicyError> {
    if name.is_empty() {
        return Err(PolicyError::beneficiary("name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(PolicyError::beneficiary(format!(
            "name exceeds {} characters",
            MAX_NAME_LEN
        )));
    }
    let allowed = |c: char| c.is_alphabetic() || matches!(c, ' ' | '.' | '\'' | '-');
    if !name.chars().all(allowed) {
        return Err(PolicyError::beneficiary(format!(
            "name contains unsupported characters: {}",
            name
        )));
    }
    Ok(())
}

fn validate_government_id(id: &str) -> Result<(), PolicyError> {
    let bytes = id.as_bytes();
    let well_formed = bytes.len() == GOVERNMENT_ID_LEN
        && bytes[..5].iter().all(u8::is_ascii_uppercase)
        && bytes[5..9].iter().all(u8::is_ascii_digit)
        && bytes[9].is_ascii_uppercase();

    if !well_formed {
        return Err(PolicyError::beneficiary(format!(
            "government id {:?} must match AAAAA9999A",
            id
        )));
    }
    Ok(())
}
