//! Installment payments
//!
//! Each installment is payable inside a grace window centred on its due
//! date. Paying before the window opens is rejected; paying after it
//! closes adds a surcharge per day of delay.
//!
//! ```text
//!        due - grace          due          due + grace
//! --------[===================|===================]-------------->
//! TooEarly      Early              OnTime            Late { delay_days }
//!                                                    fee = due x rate x delay_days
//! ```
//!
//! Dates are compared as calendar dates in the jurisdiction timezone.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::{DateRange, Money, PaymentId, PolicyId};

use crate::aggregate::Policy;
use crate::config::PolicySettings;
use crate::error::PolicyError;
use crate::schedule::Installment;

/// When a payment landed relative to its due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentTiming {
    /// Inside the grace window, before the due date
    Early { days_before_due: i64 },
    /// On the due date or after it, inside the grace window
    OnTime,
    /// After the grace window closed
    Late { delay_days: i64 },
}

impl PaymentTiming {
    pub fn is_late(&self) -> bool {
        matches!(self, PaymentTiming::Late { .. })
    }
}

/// Timing and amount owed for an installment on a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentAssessment {
    pub timing: PaymentTiming,
    pub late_fee: Money,
    pub required: Money,
}

/// Outcome of a successful payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    pub payment_id: PaymentId,
    pub policy_id: PolicyId,
    pub installment_index: usize,
    pub due_date: NaiveDate,
    pub paid_at: DateTime<Utc>,
    /// Payment date in the jurisdiction timezone
    pub paid_on: NaiveDate,
    pub timing: PaymentTiming,
    pub amount_due: Money,
    pub late_fee: Money,
    pub required: Money,
    pub amount_paid: Money,
    /// Paid above the required amount; not credited to later installments
    pub excess: Money,
}

/// Applies payments to policies
#[derive(Debug, Clone)]
pub struct PaymentProcessor {
    settings: PolicySettings,
}

impl PaymentProcessor {
    pub fn new(settings: PolicySettings) -> Self {
        Self { settings }
    }

    /// Classifies a payment date and prices the installment for it
    ///
    /// # Errors
    ///
    /// Returns `TooEarly` with the first payable date if the window has not opened
    pub fn assess(
        &self,
        installment: &Installment,
        paid_on: NaiveDate,
    ) -> Result<PaymentAssessment, PolicyError> {
        let due = installment.due_date;
        let window = DateRange::around(due, self.settings.grace_days)?;

        let timing = if paid_on < window.start {
            return Err(PolicyError::TooEarly {
                index: installment.index,
                earliest: window.start,
            });
        } else if paid_on > window.end {
            PaymentTiming::Late {
                delay_days: (paid_on - window.end).num_days(),
            }
        } else if paid_on < due {
            PaymentTiming::Early {
                days_before_due: (due - paid_on).num_days(),
            }
        } else {
            PaymentTiming::OnTime
        };

        let late_fee = match timing {
            PaymentTiming::Late { delay_days } => self.late_fee(installment.amount_due, delay_days),
            _ => Money::zero(installment.amount_due.currency()),
        };
        let required = installment.amount_due.checked_add(&late_fee)?;

        Ok(PaymentAssessment { timing, late_fee, required })
    }

    /// Surcharge for `delay_days` past the grace window
    ///
    /// Rounded to the minor unit with halves going up, so the fee is never
    /// below the exact surcharge.
    pub fn late_fee(&self, amount_due: Money, delay_days: i64) -> Money {
        let factor = self.settings.late_fee_daily_rate.as_decimal() * Decimal::from(delay_days);
        amount_due.multiply_to_currency(factor)
    }

    /// Pays installment `index` of `policy`
    ///
    /// The policy is modified only when every check passes. The first
    /// successful payment moves the policy from Initiated to Ongoing.
    ///
    /// # Errors
    ///
    /// In order of precedence: `PolicyClosed`, `InstallmentNotFound`,
    /// `AlreadyPaid`, `OutOfOrderPayment`, `TooEarly`, `CurrencyMismatch`,
    /// `InsufficientPayment`
    pub fn pay(
        &self,
        policy: &mut Policy,
        index: usize,
        amount_paid: Money,
        paid_at: DateTime<Utc>,
    ) -> Result<PaymentReceipt, PolicyError> {
        if policy.status().is_terminal() {
            return Err(PolicyError::PolicyClosed {
                status: policy.status().to_string(),
            });
        }

        let installment = policy
            .installment(index)
            .ok_or(PolicyError::InstallmentNotFound {
                index,
                count: policy.installments().len(),
            })?;

        if installment.is_paid() {
            let paid_on = installment
                .paid_date
                .map(|at| self.settings.timezone.local_date(at))
                .unwrap_or(installment.due_date);
            return Err(PolicyError::AlreadyPaid { index, paid_on });
        }

        if let Some(pending) = policy.next_pending() {
            if pending.index < index {
                return Err(PolicyError::OutOfOrderPayment {
                    index,
                    pending_index: pending.index,
                });
            }
        }

        let paid_on = self.settings.timezone.local_date(paid_at);
        let assessment = self.assess(installment, paid_on)?;
        let required = assessment.required;

        if amount_paid.currency() != required.currency() {
            return Err(PolicyError::CurrencyMismatch {
                expected: required.currency().to_string(),
                actual: amount_paid.currency().to_string(),
            });
        }
        if amount_paid.amount() < required.amount() {
            return Err(PolicyError::InsufficientPayment {
                required,
                supplied: amount_paid,
            });
        }

        let receipt = PaymentReceipt {
            payment_id: PaymentId::new_v7(),
            policy_id: policy.id(),
            installment_index: index,
            due_date: installment.due_date,
            paid_at,
            paid_on,
            timing: assessment.timing,
            amount_due: installment.amount_due,
            late_fee: assessment.late_fee,
            required,
            amount_paid,
            excess: amount_paid.checked_sub(&required)?,
        };

        policy.mark_paid(index, receipt.payment_id, paid_at, amount_paid, assessment.late_fee)?;

        tracing::debug!(
            policy_id = %receipt.policy_id,
            installment = index,
            timing = ?receipt.timing,
            late_fee = %receipt.late_fee,
            "Installment payment applied"
        );

        Ok(receipt)
    }
}
