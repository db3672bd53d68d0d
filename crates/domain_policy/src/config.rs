//! Engine configuration
//!
//! Business constants that product may want to tune (grace window, late-fee
//! rate, coverage ratio) are read once at start-up into [`PolicySettings`].
//! Every field has a default matching the documented product rules.

use rust_decimal_macros::dec;
use serde::Deserialize;

use core_kernel::{Currency, Rate, Timezone};

use crate::error::PolicyError;

/// Engine settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    /// Days either side of a due date in which payment carries no surcharge
    pub grace_days: u32,
    /// Surcharge per day past the grace window, as a fraction of the installment
    pub late_fee_daily_rate: Rate,
    /// Total coverage as a fraction of the premium
    pub coverage_ratio: Rate,
    /// Currency premiums and installments are denominated in
    pub currency: Currency,
    /// Jurisdiction whose calendar date classifies a payment timestamp
    pub timezone: Timezone,
    /// Reject frequencies that do not evenly divide the term
    pub require_even_frequency: bool,
    /// Optional JSON plan catalog; the built-in catalog is used when unset
    pub plan_catalog_path: Option<String>,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            grace_days: 10,
            late_fee_daily_rate: Rate::new(dec!(0.10)),
            coverage_ratio: Rate::new(dec!(0.30)),
            currency: Currency::INR,
            timezone: Timezone::default(),
            require_even_frequency: true,
            plan_catalog_path: None,
        }
    }
}

impl PolicySettings {
    /// Loads settings from `POLICY_*` environment variables
    ///
    /// Unset variables keep their defaults, e.g. `POLICY_GRACE_DAYS=7`.
    pub fn from_env() -> Result<Self, PolicyError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("POLICY").try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| PolicyError::configuration(e.to_string()))
    }

    /// Loads a `.env` file if present, then reads the environment
    pub fn load() -> Result<Self, PolicyError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(PolicyError::configuration(err.to_string()));
            }
        }
        let settings = Self::from_env()?;
        tracing::debug!(
            grace_days = settings.grace_days,
            late_fee_daily_rate = %settings.late_fee_daily_rate,
            currency = %settings.currency,
            "Policy settings loaded"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_product_rules() {
        let settings = PolicySettings::default();

        assert_eq!(settings.grace_days, 10);
        assert_eq!(settings.late_fee_daily_rate.as_decimal(), dec!(0.10));
        assert_eq!(settings.coverage_ratio.as_decimal(), dec!(0.30));
        assert_eq!(settings.currency, Currency::INR);
        assert!(settings.require_even_frequency);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: PolicySettings =
            serde_json::from_str(r#"{"grace_days": 7, "timezone": "UTC"}"#).unwrap();

        assert_eq!(settings.grace_days, 7);
        assert_eq!(settings.timezone, Timezone::new(chrono_tz::UTC));
        assert_eq!(settings.coverage_ratio.as_decimal(), dec!(0.30));
    }
}
