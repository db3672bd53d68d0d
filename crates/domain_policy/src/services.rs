//! Policy application service
//!
//! [`PolicyService`] is the entry point used by the transport layer. It
//! loads the owning user through the [`UserStore`] port, runs the request
//! through the synchronous engine (factory or payment processor) on a copy
//! of the policy, and persists the copy only when the engine accepts it.
//! Domain events are drained before the write, so stored policies never
//! carry an event buffer.
//!
//! # Concurrency
//!
//! Requests on the same policy are serialized by a per-policy async lock;
//! requests on different policies proceed in parallel. Creating a policy
//! takes a per-user lock so that two purchases cannot claim the same
//! sequence number.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};

use core_kernel::Money;

use crate::aggregate::Policy;
use crate::commands::{ClosePolicyRequest, CreatePolicyRequest, PayInstallmentRequest, PolicyRef};
use crate::config::PolicySettings;
use crate::error::PolicyError;
use crate::events::PolicyEvent;
use crate::factory::PolicyFactory;
use crate::payment::{PaymentProcessor, PaymentReceipt};
use crate::plan::{Plan, PlanCatalog};
use crate::ports::UserStore;
use crate::schedule::Installment;
use crate::user::{User, UserId};

/// Result of a successful installment payment
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    /// Policy state after the payment
    pub policy: Policy,
    /// The installment that was paid
    pub installment: Installment,
    pub receipt: PaymentReceipt,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LockKey {
    /// Held while a user's next sequence number is assigned
    User(UserId),
    /// Held while a policy is read, mutated and written back
    Policy(UserId, u32),
}

/// Async mutexes handed out per key; entries live as long as the service
#[derive(Debug, Default)]
struct LockRegistry {
    handles: Mutex<HashMap<LockKey, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    async fn acquire(&self, key: LockKey) -> OwnedMutexGuard<()> {
        let handle = {
            let mut handles = self.handles.lock().await;
            Arc::clone(handles.entry(key.clone()).or_default())
        };
        debug!(?key, "Acquiring lock");
        handle.lock_owned().await
    }
}

/// Application service for policy purchase, payment and closure
pub struct PolicyService {
    store: Arc<dyn UserStore>,
    catalog: PlanCatalog,
    settings: PolicySettings,
    factory: PolicyFactory,
    processor: PaymentProcessor,
    locks: LockRegistry,
}

impl PolicyService {
    pub fn new(store: Arc<dyn UserStore>, catalog: PlanCatalog, settings: PolicySettings) -> Self {
        Self {
            store,
            catalog,
            factory: PolicyFactory::new(settings.clone()),
            processor: PaymentProcessor::new(settings.clone()),
            settings,
            locks: LockRegistry::default(),
        }
    }

    /// Builds the service with the catalog named in the settings, or the
    /// built-in catalog when none is configured
    pub fn from_settings(store: Arc<dyn UserStore>, settings: PolicySettings) -> Result<Self, PolicyError> {
        let catalog = match settings.plan_catalog_path.as_deref() {
            Some(path) => PlanCatalog::from_path(path)?,
            None => PlanCatalog::builtin(),
        };
        Ok(Self::new(store, catalog, settings))
    }

    pub fn settings(&self) -> &PolicySettings {
        &self.settings
    }

    /// Plans available for purchase
    pub fn plans(&self) -> &[Plan] {
        self.catalog.plans()
    }

    /// Sells a new policy to a user
    ///
    /// # Errors
    ///
    /// `UserNotFound`, or the factory's validation error
    #[instrument(skip(self, request), fields(user = %user_id, plan_id = %request.plan_id))]
    pub async fn create_policy(
        &self,
        user_id: &UserId,
        request: CreatePolicyRequest,
        as_of: NaiveDate,
    ) -> Result<Policy, PolicyError> {
        let _guard = self.locks.acquire(LockKey::User(user_id.clone())).await;
        let user = self.load_user(user_id).await?;

        let mut policy = self
            .factory
            .create(&self.catalog, &request, user.policy_count(), as_of)
            .map_err(|e| rejected("create_policy", e))?;

        let events = policy.take_events();
        self.store.insert_policy(user_id, policy.clone()).await?;
        publish(events);

        info!(
            policy_id = %policy.id(),
            unique_identifier = policy.unique_identifier(),
            emi = %policy.emi(),
            installments = policy.installments().len(),
            "Policy created"
        );
        Ok(policy)
    }

    /// Pays one installment of a user's policy
    ///
    /// The amount is taken in the configured currency.
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `PolicyNotFound`, or the payment processor's error
    #[instrument(
        skip(self, request),
        fields(user = %user_id, policy = %request.policy, installment = request.installment_index)
    )]
    pub async fn pay_installment(
        &self,
        user_id: &UserId,
        request: PayInstallmentRequest,
    ) -> Result<PaymentOutcome, PolicyError> {
        let (_guard, mut policy) = self.lock_policy(user_id, request.policy).await?;
        let amount = Money::new(request.amount_paid, self.settings.currency);

        let receipt = self
            .processor
            .pay(&mut policy, request.installment_index, amount, request.paid_at)
            .map_err(|e| rejected("pay_installment", e))?;

        let events = policy.take_events();
        self.store.replace_policy(user_id, policy.clone()).await?;
        publish(events);

        info!(
            policy_id = %policy.id(),
            payment_id = %receipt.payment_id,
            late_fee = %receipt.late_fee,
            status = %policy.status(),
            "Installment paid"
        );

        let installment = policy
            .installment(request.installment_index)
            .cloned()
            .ok_or_else(|| PolicyError::InstallmentNotFound {
                index: request.installment_index,
                count: policy.installments().len(),
            })?;

        Ok(PaymentOutcome { policy, installment, receipt })
    }

    /// Drops or cancels a policy
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `PolicyNotFound`, or `InvalidStateTransition` if the
    /// policy is already closed
    #[instrument(skip(self, request), fields(user = %user_id, policy = %request.policy))]
    pub async fn close_policy(
        &self,
        user_id: &UserId,
        request: ClosePolicyRequest,
        at: DateTime<Utc>,
    ) -> Result<Policy, PolicyError> {
        let (_guard, mut policy) = self.lock_policy(user_id, request.policy).await?;

        policy
            .close(request.closure, at)
            .map_err(|e| rejected("close_policy", e))?;

        let events = policy.take_events();
        self.store.replace_policy(user_id, policy.clone()).await?;
        publish(events);

        info!(policy_id = %policy.id(), status = %policy.status(), "Policy closed");
        Ok(policy)
    }

    /// Fetches one of a user's policies
    pub async fn get_policy(&self, user_id: &UserId, policy: PolicyRef) -> Result<Policy, PolicyError> {
        let user = self.load_user(user_id).await?;
        find_policy(&user, policy).cloned()
    }

    /// All policies owned by a user, in purchase order
    pub async fn list_policies(&self, user_id: &UserId) -> Result<Vec<Policy>, PolicyError> {
        let user = self.load_user(user_id).await?;
        Ok(user.policies().to_vec())
    }

    /// Takes the policy's lock and returns a fresh copy read under it
    async fn lock_policy(
        &self,
        user_id: &UserId,
        policy: PolicyRef,
    ) -> Result<(OwnedMutexGuard<()>, Policy), PolicyError> {
        let sequence = match policy {
            PolicyRef::Sequence(seq) => seq,
            PolicyRef::Id(_) => {
                let user = self.load_user(user_id).await?;
                find_policy(&user, policy)?.unique_identifier()
            }
        };

        let guard = self
            .locks
            .acquire(LockKey::Policy(user_id.clone(), sequence))
            .await;
        let user = self.load_user(user_id).await?;
        let current = find_policy(&user, PolicyRef::Sequence(sequence))?.clone();
        Ok((guard, current))
    }

    async fn load_user(&self, user_id: &UserId) -> Result<User, PolicyError> {
        self.store.get_user(user_id).await.map_err(|e| {
            if e.is_not_found() {
                PolicyError::UserNotFound(user_id.to_string())
            } else {
                PolicyError::Storage(e)
            }
        })
    }
}

fn find_policy(user: &User, policy: PolicyRef) -> Result<&Policy, PolicyError> {
    user.find_policy(policy)
        .ok_or_else(|| PolicyError::PolicyNotFound(policy.to_string()))
}

fn rejected(operation: &'static str, error: PolicyError) -> PolicyError {
    warn!(
        operation,
        category = ?error.category(),
        error = %error,
        "Request rejected"
    );
    error
}

fn publish(events: Vec<PolicyEvent>) {
    for event in events {
        debug!(
            event_type = event.event_type(),
            policy_id = %event.policy_id(),
            "Domain event"
        );
    }
}
