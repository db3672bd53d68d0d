//! Policyholders
//!
//! Users are registered elsewhere; this crate reads them and adds or
//! replaces the policies they own. A user is identified by email.

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::PolicyId;

use crate::aggregate::Policy;
use crate::commands::PolicyRef;

/// Email address identifying a user, stored lower-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(email: impl AsRef<str>) -> Self {
        Self(email.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

/// A policyholder and the policies they own, in purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    policies: Vec<Policy>,
}

impl User {
    pub fn new(id: UserId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            policies: Vec::new(),
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    pub fn policy_count(&self) -> usize {
        self.policies.len()
    }

    pub fn policy_by_id(&self, id: PolicyId) -> Option<&Policy> {
        self.policies.iter().find(|p| p.id() == id)
    }

    pub fn policy_by_sequence(&self, sequence: u32) -> Option<&Policy> {
        self.policies.iter().find(|p| p.unique_identifier() == sequence)
    }

    /// Resolves either form of policy reference
    pub fn find_policy(&self, policy: PolicyRef) -> Option<&Policy> {
        match policy {
            PolicyRef::Id(id) => self.policy_by_id(id),
            PolicyRef::Sequence(seq) => self.policy_by_sequence(seq),
        }
    }

    pub(crate) fn push_policy(&mut self, policy: Policy) {
        self.policies.push(policy);
    }

    /// Swaps in the new state of a policy; returns false if the user does not own it
    pub(crate) fn replace_policy(&mut self, policy: Policy) -> bool {
        match self.policies.iter_mut().find(|p| p.id() == policy.id()) {
            Some(slot) => {
                *slot = policy;
                true
            }
            None => false,
        }
    }
}
