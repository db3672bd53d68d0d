//! Requests accepted by the policy service
//!
//! Shapes and field types are already checked by the transport; these
//! structs only carry the values. Business rules are enforced by the
//! factory and the payment processor.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::PolicyId;

use crate::aggregate::Closure;

/// Beneficiary as submitted, before format checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryInput {
    pub name: String,
    pub government_id: String,
}

/// Purchase of a policy under a catalog plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePolicyRequest {
    pub plan_id: String,
    pub premium: Decimal,
    /// Term in months
    pub months: u32,
    /// Months between installments
    pub frequency: u32,
    pub beneficiary: BeneficiaryInput,
}

/// Addresses one of a user's policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyRef {
    /// The global policy id
    Id(PolicyId),
    /// The per-user sequence number
    Sequence(u32),
}

impl std::fmt::Display for PolicyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyRef::Id(id) => write!(f, "{}", id),
            PolicyRef::Sequence(seq) => write!(f, "#{}", seq),
        }
    }
}

/// Payment of one installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayInstallmentRequest {
    pub policy: PolicyRef,
    pub installment_index: usize,
    pub amount_paid: Decimal,
    pub paid_at: DateTime<Utc>,
}

/// Administrative closure of a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePolicyRequest {
    pub policy: PolicyRef,
    pub closure: Closure,
}
