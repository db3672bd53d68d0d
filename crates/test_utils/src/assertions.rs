//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::{add_months, Money};
use domain_policy::{ErrorCategory, Installment, Policy, PolicyError, ScheduleTerms};
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts every structural property a freshly generated schedule must have
///
/// - `months / frequency` entries, indexed from zero
/// - due date `i` is `start + i x frequency` calendar months
/// - every amount is the EMI and cumulative `i` is `(i + 1) x emi`
/// - every entry is pending
pub fn assert_schedule_invariants(schedule: &[Installment], terms: &ScheduleTerms) {
    assert_eq!(
        schedule.len(),
        terms.installment_count(),
        "Expected {} installments for {} months every {} months",
        terms.installment_count(),
        terms.months,
        terms.frequency
    );

    for (position, installment) in schedule.iter().enumerate() {
        let step = u32::try_from(position).expect("schedule index fits in u32");
        let expected_due = add_months(terms.start, step * terms.frequency)
            .expect("due date within calendar range");

        assert_eq!(installment.index, position, "Installment out of position");
        assert_eq!(
            installment.due_date, expected_due,
            "Installment {} due on {}, expected {}",
            position, installment.due_date, expected_due
        );
        assert_eq!(installment.amount_due, terms.emi, "Installment {} amount", position);
        assert_eq!(
            installment.cumulative_expected,
            terms.emi.times(step + 1),
            "Installment {} cumulative amount",
            position
        );
        assert!(installment.is_pending(), "Installment {} should start pending", position);
        assert!(installment.paid_date.is_none());
    }

    for pair in schedule.windows(2) {
        assert!(
            pair[0].due_date < pair[1].due_date,
            "Due dates must increase: {} then {}",
            pair[0].due_date,
            pair[1].due_date
        );
    }
}

/// Asserts that an installment is recorded as paid
pub fn assert_installment_paid(policy: &Policy, index: usize) {
    let installment = policy
        .installment(index)
        .unwrap_or_else(|| panic!("Policy has no installment {}", index));
    assert!(installment.is_paid(), "Installment {} should be paid", index);
    assert!(installment.paid_date.is_some(), "Installment {} has no paid date", index);
}

/// Asserts that a result failed with an error of the given category
pub fn assert_error_category<T: std::fmt::Debug>(
    result: &Result<T, PolicyError>,
    category: ErrorCategory,
) {
    match result {
        Err(e) => assert_eq!(
            e.category(),
            category,
            "Expected a {:?} error, got {:?}: {}",
            category,
            e.category(),
            e
        ),
        Ok(value) => panic!("Expected a {:?} error, got Ok({:?})", category, value),
    }
}
