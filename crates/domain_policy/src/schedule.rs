//! Installment schedule (the policy illustration)
//!
//! The schedule is a pure function of the policy's EMI, term, frequency and
//! start date. [`InstallmentScheduler::schedule`] returns a lazy iterator
//! that can be cloned and replayed; [`InstallmentScheduler::build`]
//! collects it.
//!
//! ```text
//! term = 12 months, frequency = 3, start = 2024-01-15
//!
//! #0  2024-01-15   emi   cumulative 1 x emi
//! #1  2024-04-15   emi   cumulative 2 x emi
//! #2  2024-07-15   emi   cumulative 3 x emi
//! #3  2024-10-15   emi   cumulative 4 x emi
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{add_months, Money};

/// Installment lifecycle; `Paid` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    Pending,
    Paid,
}

/// One payment event of a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// Zero-based position in the schedule
    pub index: usize,
    /// Date the installment falls due
    pub due_date: NaiveDate,
    /// EMI owed, before any late fee
    pub amount_due: Money,
    /// Total expected once this installment is paid: `(index + 1) x amount_due`
    pub cumulative_expected: Money,
    pub status: InstallmentStatus,
    pub paid_date: Option<DateTime<Utc>>,
    /// Amount received, including any overpayment
    pub amount_paid: Option<Money>,
    /// Late fee charged on top of the EMI
    pub late_fee: Option<Money>,
}

impl Installment {
    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    pub fn is_pending(&self) -> bool {
        self.status == InstallmentStatus::Pending
    }
}

/// The inputs a schedule is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTerms {
    pub emi: Money,
    pub months: u32,
    pub frequency: u32,
    pub start: NaiveDate,
}

impl ScheduleTerms {
    /// Number of installments; a trailing partial interval is dropped
    pub fn installment_count(&self) -> usize {
        if self.frequency == 0 {
            return 0;
        }
        (self.months / self.frequency) as usize
    }
}

/// Lazy, restartable sequence of installments
#[derive(Debug, Clone)]
pub struct Schedule {
    terms: ScheduleTerms,
    next: usize,
}

impl Schedule {
    pub fn terms(&self) -> &ScheduleTerms {
        &self.terms
    }
}

impl Iterator for Schedule {
    type Item = Installment;

    fn next(&mut self) -> Option<Installment> {
        let count = self.terms.installment_count();
        if self.next >= count {
            return None;
        }
        let index = self.next;
        let position = u32::try_from(index).ok()?;
        let offset = position.checked_mul(self.terms.frequency)?;
        let due_date = add_months(self.terms.start, offset).ok()?;
        self.next += 1;

        Some(Installment {
            index,
            due_date,
            amount_due: self.terms.emi,
            cumulative_expected: self.terms.emi.times(position + 1),
            status: InstallmentStatus::Pending,
            paid_date: None,
            amount_paid: None,
            late_fee: None,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.terms.installment_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Schedule {}

/// Generates installment schedules
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallmentScheduler;

impl InstallmentScheduler {
    /// Returns the lazy schedule for the given terms
    pub fn schedule(&self, terms: ScheduleTerms) -> Schedule {
        Schedule { terms, next: 0 }
    }

    /// Collects the full schedule
    pub fn build(&self, terms: ScheduleTerms) -> Vec<Installment> {
        let installments: Vec<Installment> = self.schedule(terms).collect();
        tracing::debug!(
            months = terms.months,
            frequency = terms.frequency,
            start = %terms.start,
            installments = installments.len(),
            "Schedule built"
        );
        installments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn terms(months: u32, frequency: u32) -> ScheduleTerms {
        ScheduleTerms {
            emi: Money::new(dec!(25000), Currency::INR),
            months,
            frequency,
            start: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_quarterly_schedule() {
        let schedule = InstallmentScheduler.build(terms(12, 3));

        let dates: Vec<String> = schedule.iter().map(|i| i.due_date.to_string()).collect();
        assert_eq!(dates, ["2024-01-15", "2024-04-15", "2024-07-15", "2024-10-15"]);
        assert_eq!(schedule[3].cumulative_expected.amount(), dec!(100000));
        assert!(schedule.iter().all(Installment::is_pending));
    }

    #[test]
    fn test_partial_interval_is_dropped() {
        assert_eq!(InstallmentScheduler.build(terms(14, 3)).len(), 4);
    }

    #[test]
    fn test_schedule_is_restartable() {
        let lazy = InstallmentScheduler.schedule(terms(24, 2));
        let first: Vec<_> = lazy.clone().collect();
        let second: Vec<_> = lazy.collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 12);
    }

    #[test]
    fn test_schedule_length_is_known_up_front() {
        let mut lazy = InstallmentScheduler.schedule(terms(12, 3));
        assert_eq!(lazy.len(), 4);

        lazy.next();
        assert_eq!(lazy.size_hint(), (3, Some(3)));
        assert_eq!(lazy.len(), 3);
    }

    #[test]
    fn test_zero_frequency_yields_nothing() {
        assert!(InstallmentScheduler.build(terms(12, 0)).is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use core_kernel::Currency;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn due_dates_increase_and_cumulative_tracks_index(
            emi_minor in 1i64..100_000_000i64,
            months in 1u32..120u32,
            frequency in 1u32..12u32,
            day in 1u32..28u32
        ) {
            let terms = ScheduleTerms {
                emi: Money::from_minor(emi_minor, Currency::INR),
                months,
                frequency,
                start: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            };
            let schedule = InstallmentScheduler.build(terms);

            prop_assert_eq!(schedule.len(), (months / frequency) as usize);
            for pair in schedule.windows(2) {
                prop_assert!(pair[0].due_date < pair[1].due_date);
                prop_assert!(pair[0].cumulative_expected.amount() < pair[1].cumulative_expected.amount());
            }
            for installment in &schedule {
                prop_assert_eq!(
                    installment.cumulative_expected,
                    terms.emi.times(installment.index as u32 + 1)
                );
            }
        }
    }
}
