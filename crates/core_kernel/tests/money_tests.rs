//! Tests for the Money module
//!
//! Tests cover creation, checked arithmetic, rounding to the currency's
//! minor unit, summing and rates.

use core_kernel::{Currency, Money, MoneyError, Rate};
use rust_decimal_macros::dec;
use std::cmp::Ordering;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::INR);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_minor_converts_paise() {
        let m = Money::from_minor(2571429, Currency::INR);
        assert_eq!(m.amount(), dec!(25714.29));
    }

    #[test]
    fn test_from_minor_handles_jpy_no_decimals() {
        let m = Money::from_minor(10000, Currency::JPY);
        assert_eq!(m.amount(), dec!(10000));
    }

    #[test]
    fn test_default_currency_is_rupee() {
        assert_eq!(Currency::default(), Currency::INR);
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_currency_mismatch() {
        let a = Money::new(dec!(100), Currency::INR);
        let b = Money::new(dec!(100), Currency::USD);

        assert!(matches!(a.checked_add(&b), Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_checked_cmp() {
        let small = Money::new(dec!(30000), Currency::INR);
        let large = Money::new(dec!(33000), Currency::INR);

        assert_eq!(small.checked_cmp(&large).unwrap(), Ordering::Less);
        assert!(small.checked_cmp(&Money::zero(Currency::EUR)).is_err());
    }

    #[test]
    fn test_times_counts_installments() {
        let emi = Money::new(dec!(25714.29), Currency::INR);
        assert_eq!(emi.times(4).amount(), dec!(102857.16));
    }

    #[test]
    fn test_divide_by_zero_error() {
        let m = Money::new(dec!(100), Currency::INR);
        assert!(matches!(m.divide(dec!(0)), Err(MoneyError::DivisionByZero)));
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total = Money::sum(Currency::INR, std::iter::empty()).unwrap();
        assert!(total.is_zero());
    }

    #[test]
    fn test_sum_rejects_mixed_currencies() {
        let amounts = [
            Money::new(dec!(1), Currency::INR),
            Money::new(dec!(1), Currency::GBP),
        ];
        assert!(Money::sum(Currency::INR, amounts.iter()).is_err());
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_round_to_currency_inr() {
        let m = Money::new(dec!(25714.2857), Currency::INR);
        assert_eq!(m.round_to_currency().amount(), dec!(25714.29));
    }

    #[test]
    fn test_round_to_currency_jpy() {
        let m = Money::new(dec!(1234.56), Currency::JPY);
        assert_eq!(m.round_to_currency().amount(), dec!(1235));
    }

    #[test]
    fn test_charge_rounds_half_paisa_up() {
        let emi = Money::new(dec!(25714.29), Currency::INR);

        assert_eq!(emi.multiply_to_currency(dec!(0.5)).amount(), dec!(12857.15));
        assert_eq!(emi.multiply(dec!(0.5)).round_to_currency().amount(), dec!(12857.14));
    }

    #[test]
    fn test_charge_rounds_product_once() {
        let m = Money::new(dec!(0.2899), Currency::INR);
        assert_eq!(m.multiply_to_currency(dec!(0.5)).amount(), dec!(0.14));
    }

    #[test]
    fn test_display_uses_minor_unit() {
        let m = Money::new(dec!(10500), Currency::INR);
        assert_eq!(m.to_string(), "₹ 10500.00");
    }
}

mod rate {
    use super::*;

    #[test]
    fn test_rate_from_percentage() {
        let rate = Rate::from_percentage(dec!(30));
        assert_eq!(rate.as_decimal(), dec!(0.30));
    }

    #[test]
    fn test_apply_rate() {
        let premium = Money::new(dec!(120000), Currency::INR);
        let coverage = Rate::new(dec!(0.30)).apply(&premium);
        assert_eq!(coverage.amount(), dec!(36000));
    }

    #[test]
    fn test_rate_deserializes_from_number() {
        let rate: Rate = serde_json::from_str("0.1").unwrap();
        assert_eq!(rate.as_decimal(), dec!(0.1));
    }
}
