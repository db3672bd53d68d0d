//! Policy EMI Domain
//!
//! This crate sells policies under catalog plans, generates their
//! installment (EMI) schedules and processes installment payments with
//! grace-window and late-fee rules.
//!
//! # Architecture
//!
//! - **Engine** (synchronous, time passed in explicitly): [`PolicyFactory`],
//!   [`InstallmentScheduler`], [`PaymentProcessor`]
//! - **Aggregate**: [`Policy`] owns its schedule and lifecycle
//! - **Application service**: [`PolicyService`] serializes work per policy
//!   and persists through the [`UserStore`] port
//!
//! # Policy Lifecycle
//!
//! ```text
//! Initiated -> Ongoing -> UserDropped
//!          \          \-> Cancelled
//!           \-> UserDropped | Cancelled
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{PolicyService, PolicySettings, PlanCatalog};
//! use domain_policy::ports::memory::InMemoryUserStore;
//!
//! let service = PolicyService::new(
//!     Arc::new(InMemoryUserStore::new()),
//!     PlanCatalog::builtin(),
//!     PolicySettings::load()?,
//! );
//! let policy = service.create_policy(&user_id, request, today).await?;
//! ```

pub mod aggregate;
pub mod beneficiary;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod factory;
pub mod payment;
pub mod plan;
pub mod ports;
pub mod schedule;
pub mod services;
pub mod user;

pub use aggregate::{Closure, Policy, PolicyStatus};
pub use beneficiary::Beneficiary;
pub use commands::{
    BeneficiaryInput, ClosePolicyRequest, CreatePolicyRequest, PayInstallmentRequest, PolicyRef,
};
pub use config::PolicySettings;
pub use error::{ErrorCategory, PolicyError};
pub use events::PolicyEvent;
pub use factory::PolicyFactory;
pub use payment::{PaymentAssessment, PaymentProcessor, PaymentReceipt, PaymentTiming};
pub use plan::{Plan, PlanCatalog};
pub use ports::UserStore;
pub use schedule::{Installment, InstallmentScheduler, InstallmentStatus, Schedule, ScheduleTerms};
pub use services::{PaymentOutcome, PolicyService};
pub use user::{User, UserId};
