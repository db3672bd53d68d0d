//! Policy Domain Ports
//!
//! The service reaches users and their policies only through [`UserStore`].
//! Policy writes are per policy (`insert_policy`, `replace_policy`) so that
//! saving one policy never overwrites a concurrent change to a sibling.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_policy::ports::{memory::InMemoryUserStore, UserStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
//! let service = PolicyService::new(store, PlanCatalog::builtin(), settings);
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError};

use crate::aggregate::Policy;
use crate::user::{User, UserId};

/// Storage interface for users and the policies they own
#[async_trait]
pub trait UserStore: DomainPort {
    /// Fetches a user with all of their policies
    async fn get_user(&self, id: &UserId) -> Result<User, PortError>;

    /// Creates or overwrites a user record
    async fn put_user(&self, user: User) -> Result<(), PortError>;

    /// Appends a new policy to a user
    ///
    /// Fails with `Conflict` if the user already owns a policy with the same
    /// id or sequence number.
    async fn insert_policy(&self, user_id: &UserId, policy: Policy) -> Result<(), PortError>;

    /// Replaces the stored state of an existing policy
    async fn replace_policy(&self, user_id: &UserId, policy: Policy) -> Result<(), PortError>;
}

/// In-memory adapter
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Users held in process memory
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryUserStore {
        users: Arc<RwLock<HashMap<UserId, User>>>,
    }

    impl InMemoryUserStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store
        pub async fn with_users(users: Vec<User>) -> Self {
            let store = Self::new();
            {
                let mut map = store.users.write().await;
                for user in users {
                    map.insert(user.id().clone(), user);
                }
            }
            store
        }
    }

    impl DomainPort for InMemoryUserStore {}

    #[async_trait]
    impl UserStore for InMemoryUserStore {
        async fn get_user(&self, id: &UserId) -> Result<User, PortError> {
            self.users
                .read()
                .await
                .get(id)
                .cloned()
                .ok_or_else(|| PortError::not_found("User", id))
        }

        async fn put_user(&self, user: User) -> Result<(), PortError> {
            self.users.write().await.insert(user.id().clone(), user);
            Ok(())
        }

        async fn insert_policy(&self, user_id: &UserId, policy: Policy) -> Result<(), PortError> {
            let mut users = self.users.write().await;
            let user = users
                .get_mut(user_id)
                .ok_or_else(|| PortError::not_found("User", user_id))?;

            let clash = user.policies().iter().any(|p| {
                p.id() == policy.id() || p.unique_identifier() == policy.unique_identifier()
            });
            if clash {
                return Err(PortError::conflict(format!(
                    "user {} already owns policy #{}",
                    user_id,
                    policy.unique_identifier()
                )));
            }

            user.push_policy(policy);
            Ok(())
        }

        async fn replace_policy(&self, user_id: &UserId, policy: Policy) -> Result<(), PortError> {
            let mut users = self.users.write().await;
            let user = users
                .get_mut(user_id)
                .ok_or_else(|| PortError::not_found("User", user_id))?;

            let policy_id = policy.id();
            if user.replace_policy(policy) {
                Ok(())
            } else {
                Err(PortError::not_found("Policy", policy_id))
            }
        }
    }
}
