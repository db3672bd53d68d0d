//! Policy domain errors
//!
//! Every failure of the engine is a recoverable, request-local
//! [`PolicyError`]. Each variant carries the boundary that was violated
//! (the allowed premium range, the earliest payable date, the amount that
//! was required) so the caller can correct and resubmit.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use core_kernel::{Money, MoneyError, PortError, TemporalError};

/// Broad classes of failure, used by the transport layer to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The request does not satisfy plan or field rules
    Validation,
    /// A referenced user, policy or installment does not exist
    Lookup,
    /// The request conflicts with the policy's current lifecycle
    Sequence,
    /// The request arrived outside the allowed time window
    Timing,
    /// The supplied money does not satisfy the amount required
    Payment,
    /// Misconfiguration or storage failure; not caused by the request
    Internal,
}

impl ErrorCategory {
    /// HTTP status the transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::Validation => 422,
            ErrorCategory::Lookup => 404,
            ErrorCategory::Sequence => 409,
            ErrorCategory::Timing => 422,
            ErrorCategory::Payment => 422,
            ErrorCategory::Internal => 500,
        }
    }
}

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Plan not found: {plan_id}")]
    PlanNotFound {
        plan_id: String,
    },

    #[error("Premium {premium} is outside the plan range [{min}, {max}]")]
    PremiumOutOfRange {
        premium: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("Term of {months} months is outside the plan range [{min}, {max}]")]
    TermOutOfRange {
        months: u32,
        min: u32,
        max: u32,
    },

    #[error("Invalid frequency {frequency} for a term of {months} months: {reason}")]
    InvalidFrequency {
        frequency: u32,
        months: u32,
        reason: String,
    },

    #[error("Invalid beneficiary: {0}")]
    InvalidBeneficiary(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Policy not found: {0}")]
    PolicyNotFound(String),

    #[error("Installment {index} not found; schedule has {count} installments")]
    InstallmentNotFound {
        index: usize,
        count: usize,
    },

    #[error("Installment {index} cannot be paid before installment {pending_index}")]
    OutOfOrderPayment {
        index: usize,
        pending_index: usize,
    },

    #[error("Installment {index} was already paid on {paid_on}")]
    AlreadyPaid {
        index: usize,
        paid_on: NaiveDate,
    },

    #[error("Policy is {status} and no longer accepts payments")]
    PolicyClosed {
        status: String,
    },

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: String,
        to: String,
    },

    #[error("Installment {index} is not payable before {earliest}")]
    TooEarly {
        index: usize,
        earliest: NaiveDate,
    },

    #[error("Insufficient payment: {required} required, {supplied} supplied")]
    InsufficientPayment {
        required: Money,
        supplied: Money,
    },

    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        expected: String,
        actual: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

impl PolicyError {
    /// Classifies the error for the caller
    pub fn category(&self) -> ErrorCategory {
        match self {
            PolicyError::PlanNotFound { .. }
            | PolicyError::PremiumOutOfRange { .. }
            | PolicyError::TermOutOfRange { .. }
            | PolicyError::InvalidFrequency { .. }
            | PolicyError::InvalidBeneficiary(_) => ErrorCategory::Validation,

            PolicyError::UserNotFound(_)
            | PolicyError::PolicyNotFound(_)
            | PolicyError::InstallmentNotFound { .. } => ErrorCategory::Lookup,

            PolicyError::OutOfOrderPayment { .. }
            | PolicyError::AlreadyPaid { .. }
            | PolicyError::PolicyClosed { .. }
            | PolicyError::InvalidStateTransition { .. } => ErrorCategory::Sequence,

            PolicyError::TooEarly { .. } => ErrorCategory::Timing,

            PolicyError::InsufficientPayment { .. }
            | PolicyError::CurrencyMismatch { .. } => ErrorCategory::Payment,

            PolicyError::Configuration(_) | PolicyError::Storage(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP status the transport layer should answer with
    pub fn status_code(&self) -> u16 {
        self.category().status_code()
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        PolicyError::Configuration(message.into())
    }

    /// Creates a beneficiary validation error
    pub fn beneficiary(message: impl Into<String>) -> Self {
        PolicyError::InvalidBeneficiary(message.into())
    }
}

impl From<MoneyError> for PolicyError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::CurrencyMismatch(expected, actual) => {
                PolicyError::CurrencyMismatch { expected, actual }
            }
            other => PolicyError::Configuration(other.to_string()),
        }
    }
}

impl From<TemporalError> for PolicyError {
    fn from(err: TemporalError) -> Self {
        PolicyError::Configuration(err.to_string())
    }
}
