//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, NaiveDate};
use core_kernel::{Currency, Money};
use domain_policy::{Plan, ScheduleTerms};
use proptest::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// A purchase request's numeric terms that a plan accepts
#[derive(Debug, Clone, Copy)]
pub struct PlanTerms {
    pub premium: Decimal,
    pub months: u32,
    pub frequency: u32,
}

/// Frequencies that evenly divide `months`
pub fn divisors(months: u32) -> Vec<u32> {
    (1..=months).filter(|f| months % f == 0).collect()
}

fn minor_bounds(plan: &Plan) -> (i64, i64) {
    let to_minor = |d: Decimal| (d * Decimal::ONE_HUNDRED).to_i64().unwrap();
    (to_minor(plan.min_amount), to_minor(plan.max_amount))
}

/// Strategy for premiums inside a plan's bounds, in whole paise
pub fn premium_strategy(plan: &Plan) -> impl Strategy<Value = Decimal> {
    let (lo, hi) = minor_bounds(plan);
    (lo..=hi).prop_map(|minor| Decimal::new(minor, 2))
}

/// Strategy for premium, term and an evenly dividing frequency valid for `plan`
pub fn plan_terms_strategy(plan: &Plan) -> impl Strategy<Value = PlanTerms> {
    let (lo, hi) = minor_bounds(plan);
    (plan.min_months..=plan.max_months)
        .prop_flat_map(|months| (Just(months), proptest::sample::select(divisors(months))))
        .prop_flat_map(move |(months, frequency)| {
            (lo..=hi).prop_map(move |minor| PlanTerms {
                premium: Decimal::new(minor, 2),
                months,
                frequency,
            })
        })
}

/// Strategy for purchase dates over a decade, month ends included
pub fn purchase_date_strategy() -> impl Strategy<Value = NaiveDate> {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0i64..3653).prop_map(move |days| base + Duration::days(days))
}

/// Strategy for EMI amounts in INR
pub fn emi_strategy() -> impl Strategy<Value = Money> {
    (100i64..50_000_000i64).prop_map(|minor| Money::from_minor(minor, Currency::INR))
}

/// Strategy for raw schedule terms, including frequencies that leave a
/// partial trailing interval
pub fn schedule_terms_strategy() -> impl Strategy<Value = ScheduleTerms> {
    (emi_strategy(), 1u32..=60u32, purchase_date_strategy())
        .prop_flat_map(|(emi, months, start)| {
            (1u32..=months).prop_map(move |frequency| ScheduleTerms {
                emi,
                months,
                frequency,
                start,
            })
        })
}

/// Strategy for day offsets from a due date that fall inside a grace window
pub fn within_grace_strategy(grace_days: u32) -> impl Strategy<Value = i64> {
    let g = i64::from(grace_days);
    -g..=g
}

/// Strategy for whole days of delay past a grace window
pub fn delay_days_strategy() -> impl Strategy<Value = i64> {
    1i64..=120i64
}
