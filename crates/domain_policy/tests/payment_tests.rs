//! Installment payment tests
//!
//! Tests cover the grace window, late surcharges, payment ordering,
//! amount checks and policy activation.

use core_kernel::{Currency, Money};
use domain_policy::{
    Closure, ErrorCategory, PaymentProcessor, PaymentTiming, Policy, PolicyError, PolicyEvent,
    PolicySettings, PolicyStatus,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::{
    assert_error_category, assert_installment_paid, assert_money_zero, delay_days_strategy,
    within_grace_strategy, DateFixtures, MoneyFixtures, TestPolicyBuilder,
};

fn processor() -> PaymentProcessor {
    PaymentProcessor::new(PolicySettings::default())
}

/// Quarterly policy bought on Jan 15, 2024 with an EMI of 30000
fn quarterly_policy() -> Policy {
    let mut policy = TestPolicyBuilder::new().build();
    policy.take_events();
    policy
}

fn due_date(policy: &Policy, index: usize) -> chrono::NaiveDate {
    policy.installments()[index].due_date
}

fn inr(amount: Decimal) -> Money {
    MoneyFixtures::inr(amount)
}

mod timing {
    use super::*;

    #[test]
    fn test_paid_on_due_date_has_no_surcharge() {
        let mut policy = quarterly_policy();
        let at = DateFixtures::noon_ist(due_date(&policy, 0));

        let receipt = processor().pay(&mut policy, 0, inr(dec!(30000)), at).unwrap();

        assert_eq!(receipt.timing, PaymentTiming::OnTime);
        assert_money_zero(&receipt.late_fee);
        assert_eq!(receipt.required, inr(dec!(30000)));
    }

    #[test]
    fn test_eleven_days_late_pays_one_day_surcharge() {
        let mut policy = quarterly_policy();
        let at = DateFixtures::noon_ist_offset(due_date(&policy, 0), 11);

        let receipt = processor().pay(&mut policy, 0, inr(dec!(33000)), at).unwrap();

        assert_eq!(receipt.timing, PaymentTiming::Late { delay_days: 1 });
        assert_eq!(receipt.late_fee, inr(dec!(3000)));
        assert_eq!(policy.installments()[0].late_fee, Some(inr(dec!(3000))));
    }

    #[test]
    fn test_fifteen_days_early_is_too_early() {
        let mut policy = quarterly_policy();
        let due = due_date(&policy, 0);
        let at = DateFixtures::noon_ist_offset(due, -15);

        let result = processor().pay(&mut policy, 0, inr(dec!(30000)), at);

        match &result {
            Err(PolicyError::TooEarly { index, earliest }) => {
                assert_eq!(*index, 0);
                assert_eq!(*earliest, DateFixtures::date(2024, 1, 5));
            }
            other => panic!("expected TooEarly, got {:?}", other),
        }
        assert_error_category(&result, ErrorCategory::Timing);
        assert_eq!(policy.status(), PolicyStatus::Initiated);
    }

    #[test]
    fn test_five_days_early_succeeds_without_surcharge() {
        let mut policy = quarterly_policy();
        let at = DateFixtures::noon_ist_offset(due_date(&policy, 0), -5);

        let receipt = processor().pay(&mut policy, 0, inr(dec!(30000)), at).unwrap();

        assert_eq!(receipt.timing, PaymentTiming::Early { days_before_due: 5 });
        assert_money_zero(&receipt.late_fee);
    }

    #[test]
    fn test_grace_days_are_configurable() {
        let settings = PolicySettings {
            grace_days: 3,
            ..PolicySettings::default()
        };
        let mut policy = quarterly_policy();
        let at = DateFixtures::noon_ist_offset(due_date(&policy, 0), 5);

        let receipt = PaymentProcessor::new(settings)
            .pay(&mut policy, 0, inr(dec!(36000)), at)
            .unwrap();

        assert_eq!(receipt.timing, PaymentTiming::Late { delay_days: 2 });
        assert_eq!(receipt.late_fee, inr(dec!(6000)));
    }
}

mod ordering {
    use super::*;

    #[test]
    fn test_skipping_an_installment_is_rejected() {
        let mut policy = quarterly_policy();
        let first = DateFixtures::noon_ist(due_date(&policy, 0));
        processor().pay(&mut policy, 0, inr(dec!(30000)), first).unwrap();

        let third = DateFixtures::noon_ist(due_date(&policy, 2));
        let result = processor().pay(&mut policy, 2, inr(dec!(30000)), third);

        assert!(matches!(
            result,
            Err(PolicyError::OutOfOrderPayment { index: 2, pending_index: 1 })
        ));
        assert_error_category(&result, ErrorCategory::Sequence);
    }

    #[test]
    fn test_paying_twice_is_rejected() {
        let mut policy = quarterly_policy();
        let at = DateFixtures::noon_ist(due_date(&policy, 0));
        processor().pay(&mut policy, 0, inr(dec!(30000)), at).unwrap();

        let result = processor().pay(&mut policy, 0, inr(dec!(30000)), at);

        match result {
            Err(PolicyError::AlreadyPaid { index, paid_on }) => {
                assert_eq!(index, 0);
                assert_eq!(paid_on, DateFixtures::purchase_date());
            }
            other => panic!("expected AlreadyPaid, got {:?}", other),
        }
    }

    #[test]
    fn test_index_out_of_range() {
        let mut policy = quarterly_policy();
        let at = DateFixtures::noon_ist(due_date(&policy, 0));

        let result = processor().pay(&mut policy, 4, inr(dec!(30000)), at);

        assert!(matches!(result, Err(PolicyError::InstallmentNotFound { index: 4, count: 4 })));
        assert_error_category(&result, ErrorCategory::Lookup);
    }

    #[test]
    fn test_whole_schedule_can_be_paid_in_order() {
        let mut policy = quarterly_policy();

        for index in 0..policy.installments().len() {
            let at = DateFixtures::noon_ist(due_date(&policy, index));
            processor().pay(&mut policy, index, inr(dec!(30000)), at).unwrap();
            assert_installment_paid(&policy, index);
        }

        assert!(policy.is_fully_paid());
        assert!(policy.next_pending().is_none());
        assert_eq!(policy.total_paid().unwrap(), inr(dec!(120000)));
    }
}

mod amounts {
    use super::*;

    #[test]
    fn test_underpayment_reports_required_amount() {
        let mut policy = quarterly_policy();
        let at = DateFixtures::noon_ist_offset(due_date(&policy, 0), 12);

        let result = processor().pay(&mut policy, 0, inr(dec!(32999.99)), at);

        match &result {
            Err(PolicyError::InsufficientPayment { required, supplied }) => {
                assert_eq!(*required, inr(dec!(36000)));
                assert_eq!(*supplied, inr(dec!(32999.99)));
            }
            other => panic!("expected InsufficientPayment, got {:?}", other),
        }
        assert!(policy.installments()[0].is_pending());
    }

    #[test]
    fn test_half_paisa_surcharge_rounds_up() {
        let mut policy = TestPolicyBuilder::new()
            .with_months(14)
            .with_frequency(3)
            .lenient_frequency()
            .build();
        let at = DateFixtures::noon_ist_offset(due_date(&policy, 0), 15);

        let result = processor().pay(&mut policy, 0, inr(dec!(38571.43)), at);
        match &result {
            Err(PolicyError::InsufficientPayment { required, .. }) => {
                assert_eq!(*required, inr(dec!(38571.44)));
            }
            other => panic!("expected InsufficientPayment, got {:?}", other),
        }

        let receipt = processor().pay(&mut policy, 0, inr(dec!(38571.44)), at).unwrap();
        assert_eq!(receipt.timing, PaymentTiming::Late { delay_days: 5 });
        assert_eq!(receipt.late_fee, inr(dec!(12857.15)));
    }

    #[test]
    fn test_overpayment_is_accepted_without_credit() {
        let mut policy = quarterly_policy();
        let first = DateFixtures::noon_ist(due_date(&policy, 0));

        let receipt = processor().pay(&mut policy, 0, inr(dec!(45000)), first).unwrap();
        assert_eq!(receipt.excess, inr(dec!(15000)));

        let second = DateFixtures::noon_ist(due_date(&policy, 1));
        let result = processor().pay(&mut policy, 1, inr(dec!(15000)), second);
        assert!(matches!(result, Err(PolicyError::InsufficientPayment { .. })));
    }

    #[test]
    fn test_foreign_currency_is_rejected() {
        let mut policy = quarterly_policy();
        let at = DateFixtures::noon_ist(due_date(&policy, 0));

        let result = processor().pay(&mut policy, 0, Money::new(dec!(30000), Currency::EUR), at);

        assert!(matches!(result, Err(PolicyError::CurrencyMismatch { .. })));
        assert_error_category(&result, ErrorCategory::Payment);
    }
}

mod lifecycle {
    use super::*;

    #[test]
    fn test_first_payment_activates_policy() {
        let mut policy = quarterly_policy();
        let first = DateFixtures::noon_ist(due_date(&policy, 0));
        processor().pay(&mut policy, 0, inr(dec!(30000)), first).unwrap();

        assert_eq!(policy.status(), PolicyStatus::Ongoing);
        let events = policy.take_events();
        assert!(matches!(
            events.as_slice(),
            [PolicyEvent::InstallmentPaid { .. }, PolicyEvent::PolicyActivated { .. }]
        ));
    }

    #[test]
    fn test_later_payments_leave_status_alone() {
        let mut policy = quarterly_policy();
        let first = DateFixtures::noon_ist(due_date(&policy, 0));
        processor().pay(&mut policy, 0, inr(dec!(30000)), first).unwrap();
        policy.take_events();

        let second = DateFixtures::noon_ist(due_date(&policy, 1));
        processor().pay(&mut policy, 1, inr(dec!(30000)), second).unwrap();

        assert_eq!(policy.status(), PolicyStatus::Ongoing);
        assert!(matches!(
            policy.take_events().as_slice(),
            [PolicyEvent::InstallmentPaid { installment_index: 1, .. }]
        ));
    }

    #[test]
    fn test_dropped_policy_refuses_payment() {
        let mut policy = quarterly_policy();
        let first = DateFixtures::noon_ist(due_date(&policy, 0));
        processor().pay(&mut policy, 0, inr(dec!(30000)), first).unwrap();
        policy
            .close(Closure::UserDropped { reason: "switched insurer".into() }, first)
            .unwrap();

        let second = DateFixtures::noon_ist(due_date(&policy, 1));
        let result = processor().pay(&mut policy, 1, inr(dec!(30000)), second);

        assert!(matches!(result, Err(PolicyError::PolicyClosed { .. })));
        assert_eq!(policy.status(), PolicyStatus::UserDropped);
    }
}

proptest! {
    #[test]
    fn prop_no_surcharge_inside_grace_window(offset in within_grace_strategy(10)) {
        let mut policy = quarterly_policy();
        let at = DateFixtures::noon_ist_offset(due_date(&policy, 0), offset);

        let receipt = processor().pay(&mut policy, 0, inr(dec!(30000)), at).unwrap();
        prop_assert!(receipt.late_fee.is_zero());
        prop_assert!(!receipt.timing.is_late());
    }

    #[test]
    fn prop_surcharge_grows_by_a_tenth_per_day(delay in delay_days_strategy()) {
        let mut policy = quarterly_policy();
        let at = DateFixtures::noon_ist_offset(due_date(&policy, 0), 10 + delay);
        let expected_fee = dec!(3000) * Decimal::from(delay);

        let receipt = processor()
            .pay(&mut policy, 0, inr(dec!(30000) + expected_fee), at)
            .unwrap();
        prop_assert_eq!(receipt.late_fee, inr(expected_fee));
        prop_assert_eq!(receipt.timing, PaymentTiming::Late { delay_days: delay });
    }
}
