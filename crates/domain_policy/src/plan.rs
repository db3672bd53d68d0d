//! Plan catalog
//!
//! A [`Plan`] is a purchasable product that bounds the premium and term of
//! policies sold under it. The [`PlanCatalog`] is loaded once at start-up
//! and is read-only afterwards.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::PolicyError;

/// A catalog entry bounding premium and term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan identifier quoted by the buyer
    pub id: String,
    /// Display name
    pub name: String,
    /// Name of the plan family this plan is sold under
    #[serde(default)]
    pub family: Option<String>,
    /// Smallest allowed premium
    pub min_amount: Decimal,
    /// Largest allowed premium
    pub max_amount: Decimal,
    /// Shortest allowed term in months
    pub min_months: u32,
    /// Longest allowed term in months
    pub max_months: u32,
}

impl Plan {
    /// Creates a plan, checking that both bounds are ordered
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        amount_bounds: (Decimal, Decimal),
        month_bounds: (u32, u32),
    ) -> Result<Self, PolicyError> {
        let plan = Self {
            id: id.into(),
            name: name.into(),
            family: None,
            min_amount: amount_bounds.0,
            max_amount: amount_bounds.1,
            min_months: month_bounds.0,
            max_months: month_bounds.1,
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Sets the plan family
    pub fn in_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    fn validate(&self) -> Result<(), PolicyError> {
        if self.id.trim().is_empty() {
            return Err(PolicyError::configuration("plan id must not be empty"));
        }
        if self.min_amount.is_sign_negative() || self.min_amount > self.max_amount {
            return Err(PolicyError::configuration(format!(
                "plan {}: invalid premium bounds [{}, {}]",
                self.id, self.min_amount, self.max_amount
            )));
        }
        if self.min_months == 0 || self.min_months > self.max_months {
            return Err(PolicyError::configuration(format!(
                "plan {}: invalid term bounds [{}, {}]",
                self.id, self.min_months, self.max_months
            )));
        }
        Ok(())
    }

    /// Returns true if the premium lies within the plan bounds (inclusive)
    pub fn allows_premium(&self, premium: Decimal) -> bool {
        premium >= self.min_amount && premium <= self.max_amount
    }

    /// Returns true if the term lies within the plan bounds (inclusive)
    pub fn allows_term(&self, months: u32) -> bool {
        months >= self.min_months && months <= self.max_months
    }
}

/// Read-only set of plans, looked up by id
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
    index: HashMap<String, usize>,
}

impl PlanCatalog {
    /// Builds a catalog, rejecting invalid plans and duplicate ids
    pub fn new(plans: Vec<Plan>) -> Result<Self, PolicyError> {
        let mut index = HashMap::with_capacity(plans.len());
        for (position, plan) in plans.iter().enumerate() {
            plan.validate()?;
            if index.insert(plan.id.clone(), position).is_some() {
                return Err(PolicyError::configuration(format!(
                    "duplicate plan id {}",
                    plan.id
                )));
            }
        }
        Ok(Self { plans, index })
    }

    /// Parses a JSON array of plans
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let plans: Vec<Plan> = serde_json::from_str(json)
            .map_err(|e| PolicyError::configuration(format!("plan catalog: {}", e)))?;
        Self::new(plans)
    }

    /// Reads a JSON plan catalog from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PolicyError::configuration(format!("plan catalog {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), plans = catalog.len(), "Plan catalog loaded");
        Ok(catalog)
    }

    /// The catalog shipped with the service
    pub fn builtin() -> Self {
        let plans = vec![
            Plan {
                id: "2345".to_string(),
                name: "whole body".to_string(),
                family: Some("Super Health Plan".to_string()),
                min_amount: dec!(100000),
                max_amount: dec!(250000),
                min_months: 12,
                max_months: 24,
            },
            Plan {
                id: "7892".to_string(),
                name: "Policy for Eyes".to_string(),
                family: Some("Classic Health Plan".to_string()),
                min_amount: dec!(110000),
                max_amount: dec!(260000),
                min_months: 10,
                max_months: 23,
            },
        ];
        let index = plans
            .iter()
            .enumerate()
            .map(|(position, plan)| (plan.id.clone(), position))
            .collect();
        Self { plans, index }
    }

    /// Looks up a plan by id
    pub fn get(&self, plan_id: &str) -> Option<&Plan> {
        self.index.get(plan_id).map(|&position| &self.plans[position])
    }

    /// Looks up a plan by id, failing with `PlanNotFound`
    pub fn require(&self, plan_id: &str) -> Result<&Plan, PolicyError> {
        self.get(plan_id).ok_or_else(|| PolicyError::PlanNotFound {
            plan_id: plan_id.to_string(),
        })
    }

    /// All plans in catalog order
    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
