//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use domain_policy::ports::memory::InMemoryUserStore;
use domain_policy::{
    BeneficiaryInput, CreatePolicyRequest, PayInstallmentRequest, Policy, PolicyError,
    PolicyFactory, PolicyRef, PolicyService, PolicySettings, User, UserId, UserStore,
};
use rust_decimal::Decimal;

use crate::fixtures::{BeneficiaryFixtures, DateFixtures, MoneyFixtures, PlanFixtures, UserFixtures};

/// Builder for policy purchase requests and the policies they create
pub struct TestPolicyBuilder {
    plan_id: String,
    premium: Decimal,
    months: u32,
    frequency: u32,
    beneficiary: BeneficiaryInput,
    as_of: NaiveDate,
    existing_policies: usize,
    settings: PolicySettings,
}

impl Default for TestPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPolicyBuilder {
    /// Plan 2345, 120000 over 12 months, paid quarterly from Jan 15, 2024
    pub fn new() -> Self {
        Self {
            plan_id: PlanFixtures::whole_body().id,
            premium: MoneyFixtures::premium(),
            months: 12,
            frequency: 3,
            beneficiary: BeneficiaryFixtures::asha(),
            as_of: DateFixtures::purchase_date(),
            existing_policies: 0,
            settings: PolicySettings::default(),
        }
    }

    pub fn with_plan(mut self, plan_id: impl Into<String>) -> Self {
        self.plan_id = plan_id.into();
        self
    }

    pub fn with_premium(mut self, premium: Decimal) -> Self {
        self.premium = premium;
        self
    }

    pub fn with_months(mut self, months: u32) -> Self {
        self.months = months;
        self
    }

    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_beneficiary(mut self, beneficiary: BeneficiaryInput) -> Self {
        self.beneficiary = beneficiary;
        self
    }

    /// Sets the purchase date
    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = date;
        self
    }

    /// Number of policies the buyer already owns
    pub fn with_existing_policies(mut self, count: usize) -> Self {
        self.existing_policies = count;
        self
    }

    /// Accepts frequencies that leave a partial trailing interval
    pub fn lenient_frequency(mut self) -> Self {
        self.settings.require_even_frequency = false;
        self
    }

    pub fn with_settings(mut self, settings: PolicySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn request(&self) -> CreatePolicyRequest {
        CreatePolicyRequest {
            plan_id: self.plan_id.clone(),
            premium: self.premium,
            months: self.months,
            frequency: self.frequency,
            beneficiary: self.beneficiary.clone(),
        }
    }

    /// Runs the request through a factory built from the builder's settings
    pub fn try_build(&self) -> Result<Policy, PolicyError> {
        PolicyFactory::new(self.settings.clone()).create(
            &PlanFixtures::catalog(),
            &self.request(),
            self.existing_policies,
            self.as_of,
        )
    }

    /// Builds the policy, panicking if the request is rejected
    pub fn build(&self) -> Policy {
        self.try_build()
            .unwrap_or_else(|e| panic!("test policy rejected: {}", e))
    }
}

/// Builder for installment payment requests
pub struct TestPaymentBuilder {
    policy: PolicyRef,
    installment_index: usize,
    amount_paid: Decimal,
    paid_at: DateTime<Utc>,
}

impl TestPaymentBuilder {
    /// Pays the first installment of policy #1 in full on the standard purchase date
    pub fn new() -> Self {
        Self {
            policy: PolicyRef::Sequence(1),
            installment_index: 0,
            amount_paid: MoneyFixtures::quarterly_emi().amount(),
            paid_at: DateFixtures::noon_ist(DateFixtures::purchase_date()),
        }
    }

    pub fn policy(mut self, policy: PolicyRef) -> Self {
        self.policy = policy;
        self
    }

    pub fn installment(mut self, index: usize) -> Self {
        self.installment_index = index;
        self
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount_paid = amount;
        self
    }

    pub fn paid_at(mut self, at: DateTime<Utc>) -> Self {
        self.paid_at = at;
        self
    }

    pub fn build(self) -> PayInstallmentRequest {
        PayInstallmentRequest {
            policy: self.policy,
            installment_index: self.installment_index,
            amount_paid: self.amount_paid,
            paid_at: self.paid_at,
        }
    }
}

impl Default for TestPaymentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a service over an in-memory store with registered users
pub struct TestServiceBuilder {
    users: Vec<User>,
    settings: PolicySettings,
}

impl Default for TestServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestServiceBuilder {
    /// One registered user with the default email
    pub fn new() -> Self {
        Self {
            users: vec![User::new(UserId::new(UserFixtures::email()), "Asha", "Rao")],
            settings: PolicySettings::default(),
        }
    }

    pub fn with_user(mut self, email: &str, first_name: &str, last_name: &str) -> Self {
        self.users.push(User::new(UserId::new(email), first_name, last_name));
        self
    }

    pub fn with_settings(mut self, settings: PolicySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the service together with its store
    pub async fn build(self) -> (PolicyService, Arc<InMemoryUserStore>) {
        let store = Arc::new(InMemoryUserStore::with_users(self.users).await);
        let port: Arc<dyn UserStore> = store.clone();
        let service = PolicyService::new(port, PlanFixtures::catalog(), self.settings);
        (service, store)
    }
}
