//! Domain events for the policy aggregate
//!
//! The aggregate buffers one event per significant change; the service
//! drains them after a successful write and emits them as structured logs
//! (and, later, to an outbox).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{PaymentId, PolicyId};

/// Domain events emitted by the Policy aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PolicyEvent {
    /// Policy purchased and its schedule generated
    PolicyCreated {
        policy_id: PolicyId,
        plan_id: String,
        unique_identifier: u32,
        installments: usize,
        validity_date: NaiveDate,
        created_on: NaiveDate,
    },

    /// An installment was paid
    InstallmentPaid {
        policy_id: PolicyId,
        payment_id: PaymentId,
        installment_index: usize,
        amount_paid: Decimal,
        late_fee: Decimal,
        timestamp: DateTime<Utc>,
    },

    /// First payment moved the policy from Initiated to Ongoing
    PolicyActivated {
        policy_id: PolicyId,
        timestamp: DateTime<Utc>,
    },

    /// Policyholder dropped the policy
    PolicyDropped {
        policy_id: PolicyId,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Policy cancelled administratively
    PolicyCancelled {
        policy_id: PolicyId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl PolicyEvent {
    /// Returns the policy this event concerns
    pub fn policy_id(&self) -> PolicyId {
        match self {
            PolicyEvent::PolicyCreated { policy_id, .. }
            | PolicyEvent::InstallmentPaid { policy_id, .. }
            | PolicyEvent::PolicyActivated { policy_id, .. }
            | PolicyEvent::PolicyDropped { policy_id, .. }
            | PolicyEvent::PolicyCancelled { policy_id, .. } => *policy_id,
        }
    }

    /// Short event name for logs
    pub fn event_type(&self) -> &'static str {
        match self {
            PolicyEvent::PolicyCreated { .. } => "PolicyCreated",
            PolicyEvent::InstallmentPaid { .. } => "InstallmentPaid",
            PolicyEvent::PolicyActivated { .. } => "PolicyActivated",
            PolicyEvent::PolicyDropped { .. } => "PolicyDropped",
            PolicyEvent::PolicyCancelled { .. } => "PolicyCancelled",
        }
    }
}
