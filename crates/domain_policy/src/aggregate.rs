//! Policy Aggregate Root
//!
//! The policy owns its installment schedule and is the consistency boundary
//! for every payment against it: callers must hold exclusive access to one
//! policy for the duration of a mutation.
//!
//! # Invariants
//!
//! - Premium and term lie within the bounds of the plan the policy was sold under
//! - `validity_date` is the creation date plus the term in calendar months
//! - Installments are paid strictly in schedule order
//! - Status only moves forward: Initiated -> Ongoing -> {UserDropped, Cancelled}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Money, PaymentId, PolicyId};

use crate::beneficiary::Beneficiary;
use crate::error::PolicyError;
use crate::events::PolicyEvent;
use crate::schedule::{Installment, InstallmentStatus, ScheduleTerms};

/// Policy lifecycle states
///
/// ```text
/// Initiated -> Ongoing -> UserDropped
///     |            \----> Cancelled
///     \-> UserDropped | Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    /// Purchased, no installment paid yet
    Initiated,
    /// At least one installment paid
    Ongoing,
    /// Dropped by the policyholder
    UserDropped,
    /// Cancelled administratively
    Cancelled,
}

impl PolicyStatus {
    /// Returns true for states that accept no further payments
    pub fn is_terminal(&self) -> bool {
        matches!(self, PolicyStatus::UserDropped | PolicyStatus::Cancelled)
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyStatus::Initiated => "initiated",
            PolicyStatus::Ongoing => "ongoing",
            PolicyStatus::UserDropped => "user_dropped",
            PolicyStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Administrative closure of a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Closure {
    UserDropped { reason: String },
    Cancelled { reason: String },
}

impl Closure {
    fn target_status(&self) -> PolicyStatus {
        match self {
            Closure::UserDropped { .. } => PolicyStatus::UserDropped,
            Closure::Cancelled { .. } => PolicyStatus::Cancelled,
        }
    }

    fn reason(&self) -> &str {
        match self {
            Closure::UserDropped { reason } | Closure::Cancelled { reason } => reason,
        }
    }
}

/// Derived fields of a freshly sold policy, computed by the factory
#[derive(Debug, Clone)]
pub(crate) struct NewPolicy {
    pub unique_identifier: u32,
    pub plan_id: String,
    pub premium: Money,
    pub months: u32,
    pub frequency: u32,
    pub emi: Money,
    pub total_coverage: Money,
    pub created_on: NaiveDate,
    pub validity_date: NaiveDate,
    pub beneficiary: Beneficiary,
    pub installments: Vec<Installment>,
}

/// The Policy aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    id: PolicyId,
    /// Sequence number within the owning user's policies, starting at 1
    unique_identifier: u32,
    plan_id: String,
    premium: Money,
    months: u32,
    /// Months between installments
    frequency: u32,
    emi: Money,
    total_coverage: Money,
    created_on: NaiveDate,
    validity_date: NaiveDate,
    status: PolicyStatus,
    beneficiary: Beneficiary,
    installments: Vec<Installment>,
    closure: Option<Closure>,
    updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    events: Vec<PolicyEvent>,
}

impl Policy {
    pub(crate) fn create(new: NewPolicy) -> Self {
        let id = PolicyId::new_v7();
        let event = PolicyEvent::PolicyCreated {
            policy_id: id,
            plan_id: new.plan_id.clone(),
            unique_identifier: new.unique_identifier,
            installments: new.installments.len(),
            validity_date: new.validity_date,
            created_on: new.created_on,
        };

        Self {
            id,
            unique_identifier: new.unique_identifier,
            plan_id: new.plan_id,
            premium: new.premium,
            months: new.months,
            frequency: new.frequency,
            emi: new.emi,
            total_coverage: new.total_coverage,
            created_on: new.created_on,
            validity_date: new.validity_date,
            status: PolicyStatus::Initiated,
            beneficiary: new.beneficiary,
            installments: new.installments,
            closure: None,
            updated_at: None,
            events: vec![event],
        }
    }

    pub fn id(&self) -> PolicyId {
        self.id
    }

    pub fn unique_identifier(&self) -> u32 {
        self.unique_identifier
    }

    pub fn plan_id(&self) -> &str {
        &self.plan_id
    }

    pub fn premium(&self) -> Money {
        self.premium
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn emi(&self) -> Money {
        self.emi
    }

    pub fn total_coverage(&self) -> Money {
        self.total_coverage
    }

    pub fn created_on(&self) -> NaiveDate {
        self.created_on
    }

    pub fn validity_date(&self) -> NaiveDate {
        self.validity_date
    }

    pub fn status(&self) -> PolicyStatus {
        self.status
    }

    pub fn beneficiary(&self) -> &Beneficiary {
        &self.beneficiary
    }

    pub fn closure(&self) -> Option<&Closure> {
        self.closure.as_ref()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// The installment schedule in due-date order
    pub fn installments(&self) -> &[Installment] {
        &self.installments
    }

    pub fn installment(&self, index: usize) -> Option<&Installment> {
        self.installments.get(index)
    }

    /// The earliest installment not yet paid
    pub fn next_pending(&self) -> Option<&Installment> {
        self.installments.iter().find(|i| i.is_pending())
    }

    pub fn paid_count(&self) -> usize {
        self.installments.iter().filter(|i| i.is_paid()).count()
    }

    /// Returns true once every installment is paid
    pub fn is_fully_paid(&self) -> bool {
        self.installments.iter().all(Installment::is_paid)
    }

    /// Inputs the schedule was generated from; rebuilding from them yields
    /// the same due dates and amounts
    pub fn schedule_terms(&self) -> ScheduleTerms {
        ScheduleTerms {
            emi: self.emi,
            months: self.months,
            frequency: self.frequency,
            start: self.created_on,
        }
    }

    /// Sum of everything received so far, late fees and overpayments included
    pub fn total_paid(&self) -> Result<Money, PolicyError> {
        let received = self.installments.iter().filter_map(|i| i.amount_paid.as_ref());
        Ok(Money::sum(self.premium.currency(), received)?)
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<PolicyEvent> {
        std::mem::take(&mut self.events)
    }

    /// Marks an installment paid; ordering and amount checks are the
    /// payment processor's job
    ///
    /// Returns true when this payment activated the policy.
    pub(crate) fn mark_paid(
        &mut self,
        index: usize,
        payment_id: PaymentId,
        paid_at: DateTime<Utc>,
        amount_paid: Money,
        late_fee: Money,
    ) -> Result<bool, PolicyError> {
        let count = self.installments.len();
        let installment = self
            .installments
            .get_mut(index)
            .ok_or(PolicyError::InstallmentNotFound { index, count })?;

        installment.status = InstallmentStatus::Paid;
        installment.paid_date = Some(paid_at);
        installment.amount_paid = Some(amount_paid);
        installment.late_fee = Some(late_fee);

        self.events.push(PolicyEvent::InstallmentPaid {
            policy_id: self.id,
            payment_id,
            installment_index: index,
            amount_paid: amount_paid.amount(),
            late_fee: late_fee.amount(),
            timestamp: paid_at,
        });

        let activated = self.status == PolicyStatus::Initiated;
        if activated {
            self.status = PolicyStatus::Ongoing;
            self.events.push(PolicyEvent::PolicyActivated {
                policy_id: self.id,
                timestamp: paid_at,
            });
        }
        self.updated_at = Some(paid_at);

        Ok(activated)
    }

    /// Closes the policy by administrative action
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the policy is already closed
    pub fn close(&mut self, closure: Closure, at: DateTime<Utc>) -> Result<(), PolicyError> {
        let target = closure.target_status();
        if self.status.is_terminal() {
            return Err(PolicyError::InvalidStateTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }

        let reason = closure.reason().to_string();
        self.events.push(match target {
            PolicyStatus::UserDropped => PolicyEvent::PolicyDropped {
                policy_id: self.id,
                reason,
                timestamp: at,
            },
            _ => PolicyEvent::PolicyCancelled {
                policy_id: self.id,
                reason,
                timestamp: at,
            },
        });

        self.status = target;
        self.closure = Some(closure);
        self.updated_at = Some(at);
        Ok(())
    }
}
