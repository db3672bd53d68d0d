//! Storage port infrastructure
//!
//! Domain crates declare their storage needs as port traits that extend
//! [`DomainPort`] and report failures as [`PortError`]. Adapters (in-memory
//! today, a durable store later) implement those traits, and the domain
//! never reaches for a process-wide table directly.
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait UserStore: DomainPort {
//!     async fn get_user(&self, id: &UserId) -> Result<User, PortError>;
//!     async fn put_user(&self, user: User) -> Result<(), PortError>;
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared between request tasks, so they must be thread-safe.
pub trait DomainPort: Send + Sync + 'static {}
