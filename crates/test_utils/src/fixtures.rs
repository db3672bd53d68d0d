//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for plans, dates and beneficiaries.
//! Everything here is deterministic except [`BeneficiaryFixtures::random`].

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use core_kernel::{Currency, Money};
use domain_policy::{BeneficiaryInput, Plan, PlanCatalog};
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for plan test data
pub struct PlanFixtures;

impl PlanFixtures {
    /// The built-in catalog
    pub fn catalog() -> PlanCatalog {
        PlanCatalog::builtin()
    }

    /// Plan 2345: 100000-250000, 12-24 months
    pub fn whole_body() -> Plan {
        Self::lookup("2345")
    }

    /// Plan 7892: 110000-260000, 10-23 months
    pub fn eyes() -> Plan {
        Self::lookup("7892")
    }

    fn lookup(plan_id: &str) -> Plan {
        PlanCatalog::builtin()
            .get(plan_id)
            .cloned()
            .unwrap_or_else(|| panic!("built-in plan {} missing", plan_id))
    }
}

/// Fixture for money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn inr(amount: Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    /// Premium used by most scenarios
    pub fn premium() -> Decimal {
        dec!(120000)
    }

    /// EMI of a 120000 premium over 12 months paid quarterly
    pub fn quarterly_emi() -> Money {
        Self::inr(dec!(30000))
    }
}

/// Fixture for temporal test data
pub struct DateFixtures;

impl DateFixtures {
    /// Standard purchase date (Jan 15, 2024)
    pub fn purchase_date() -> NaiveDate {
        Self::date(2024, 1, 15)
    }

    /// Purchase on the last day of a month, for month-end clamping
    pub fn month_end_purchase() -> NaiveDate {
        Self::date(2024, 1, 31)
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_else(|| panic!("invalid date {}-{}-{}", y, m, d))
    }

    /// Noon in Asia/Kolkata on the given date, as UTC
    pub fn noon_ist(date: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_hms_opt(6, 30, 0).unwrap())
    }

    /// Noon in Asia/Kolkata, `days` after (or before, if negative) `date`
    pub fn noon_ist_offset(date: NaiveDate, days: i64) -> DateTime<Utc> {
        Self::noon_ist(date + Duration::days(days))
    }
}

/// Fixture for beneficiary test data
pub struct BeneficiaryFixtures;

impl BeneficiaryFixtures {
    pub fn asha() -> BeneficiaryInput {
        BeneficiaryInput {
            name: "Asha Rao".to_string(),
            government_id: "ABCDE1234F".to_string(),
        }
    }

    /// Beneficiary whose identifier is not a PAN
    pub fn malformed_id() -> BeneficiaryInput {
        BeneficiaryInput {
            name: "Asha Rao".to_string(),
            government_id: "1234ABCDEF".to_string(),
        }
    }

    /// A random, well-formed beneficiary
    pub fn random() -> BeneficiaryInput {
        let letter = || char::from(b'A' + (0u8..26).fake::<u8>());
        let prefix: String = (0..5).map(|_| letter()).collect();
        let digits: u16 = (0u16..10000).fake();

        BeneficiaryInput {
            name: Name().fake(),
            government_id: format!("{}{:04}{}", prefix, digits, letter()),
        }
    }
}

/// Fixture for user test data
pub struct UserFixtures;

impl UserFixtures {
    pub fn email() -> &'static str {
        "asha.rao@example.com"
    }

    pub fn other_email() -> &'static str {
        "vikram.iyer@example.com"
    }
}
