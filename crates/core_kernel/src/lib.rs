//! Core Kernel - Foundational types for the policy EMI engine
//!
//! This crate provides the building blocks shared by the domain crates:
//! - Money types with precise decimal arithmetic
//! - Calendar-month arithmetic and jurisdiction dates
//! - Strongly-typed identifiers
//! - The storage port error type

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Rate};
pub use temporal::{add_months, shift_days, DateRange, TemporalError, Timezone};
pub use identifiers::{PolicyId, PaymentId};
pub use ports::{DomainPort, PortError};
