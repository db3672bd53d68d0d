//! Policy issuance
//!
//! [`PolicyFactory`] checks a purchase request against the plan bounds and
//! derives the priced fields of the new policy:
//!
//! ```text
//! emi            = frequency x premium / months   (rounded to the currency)
//! total_coverage = premium x coverage_ratio
//! validity_date  = as_of + months                 (calendar months)
//! sequence       = existing policies + 1
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::{add_months, Money};

use crate::aggregate::{NewPolicy, Policy};
use crate::beneficiary::Beneficiary;
use crate::commands::CreatePolicyRequest;
use crate::config::PolicySettings;
use crate::error::PolicyError;
use crate::plan::{Plan, PlanCatalog};
use crate::schedule::{InstallmentScheduler, ScheduleTerms};

/// Validates purchase requests and builds new policies
#[derive(Debug, Clone)]
pub struct PolicyFactory {
    settings: PolicySettings,
    scheduler: InstallmentScheduler,
}

impl PolicyFactory {
    pub fn new(settings: PolicySettings) -> Self {
        Self {
            settings,
            scheduler: InstallmentScheduler,
        }
    }

    pub fn settings(&self) -> &PolicySettings {
        &self.settings
    }

    /// Creates a policy for a user who already owns `existing_policies`
    ///
    /// Checks run in a fixed order so the first violated rule is reported:
    /// plan, premium, term, frequency, beneficiary.
    ///
    /// # Errors
    ///
    /// Returns the validation error for the first violated rule
    pub fn create(
        &self,
        catalog: &PlanCatalog,
        request: &CreatePolicyRequest,
        existing_policies: usize,
        as_of: NaiveDate,
    ) -> Result<Policy, PolicyError> {
        let plan = catalog.require(&request.plan_id)?;
        self.check_terms(plan, request.premium, request.months, request.frequency)?;
        let beneficiary = Beneficiary::new(
            request.beneficiary.name.as_str(),
            request.beneficiary.government_id.as_str(),
        )?;

        let unique_identifier = u32::try_from(existing_policies)
            .ok()
            .and_then(|count| count.checked_add(1))
            .ok_or_else(|| PolicyError::configuration("policy sequence exhausted"))?;

        let currency = self.settings.currency;
        let premium = Money::new(request.premium, currency);
        let emi = self.emi(premium, request.months, request.frequency)?;
        let total_coverage = self.settings.coverage_ratio.apply(&premium).round_to_currency();
        let validity_date = add_months(as_of, request.months)?;

        let installments = self.scheduler.build(ScheduleTerms {
            emi,
            months: request.months,
            frequency: request.frequency,
            start: as_of,
        });

        Ok(Policy::create(NewPolicy {
            unique_identifier,
            plan_id: plan.id.clone(),
            premium,
            months: request.months,
            frequency: request.frequency,
            emi,
            total_coverage,
            created_on: as_of,
            validity_date,
            beneficiary,
            installments,
        }))
    }

    /// Checks premium, term and frequency against a plan
    pub fn check_terms(
        &self,
        plan: &Plan,
        premium: Decimal,
        months: u32,
        frequency: u32,
    ) -> Result<(), PolicyError> {
        if !plan.allows_premium(premium) {
            return Err(PolicyError::PremiumOutOfRange {
                premium,
                min: plan.min_amount,
                max: plan.max_amount,
            });
        }
        if !plan.allows_term(months) {
            return Err(PolicyError::TermOutOfRange {
                months,
                min: plan.min_months,
                max: plan.max_months,
            });
        }

        let invalid = |reason: &str| PolicyError::InvalidFrequency {
            frequency,
            months,
            reason: reason.to_string(),
        };
        if frequency == 0 {
            return Err(invalid("frequency must be at least one month"));
        }
        if frequency > months {
            return Err(invalid("frequency exceeds the term"));
        }
        if self.settings.require_even_frequency && months % frequency != 0 {
            return Err(invalid("frequency must evenly divide the term"));
        }
        Ok(())
    }

    /// Installment amount: `frequency x premium / months`, multiplied first
    /// and rounded to the currency's minor unit
    pub fn emi(&self, premium: Money, months: u32, frequency: u32) -> Result<Money, PolicyError> {
        let emi = premium
            .multiply(Decimal::from(frequency))
            .divide(Decimal::from(months))?;
        Ok(emi.round_to_currency())
    }
}
