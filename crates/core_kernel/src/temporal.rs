//! Calendar handling for policy schedules
//!
//! Policy terms and installment intervals are expressed in calendar months,
//! not fixed 30-day blocks, so all month arithmetic goes through
//! [`add_months`]. Payment timestamps arrive in UTC and are classified by
//! their calendar date in the policy's jurisdiction, see [`Timezone`].

use chrono::{DateTime, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Timezone wrapper for policy jurisdictions
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Calendar date of a UTC instant as seen in this timezone
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        self.to_local(utc).date_naive()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Asia::Kolkata)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Date out of range: {date} shifted by {months} months")]
    MonthOverflow {
        date: NaiveDate,
        months: u32,
    },

    #[error("Date out of range: {date} shifted by {days} days")]
    DayOverflow {
        date: NaiveDate,
        days: i64,
    },
}

/// Adds calendar months to a date
///
/// The day of month is clamped to the last day of the target month, so
/// 31 January plus one month is 29 February in a leap year.
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, TemporalError> {
    date.checked_add_months(Months::new(months))
        .ok_or(TemporalError::MonthOverflow { date, months })
}

/// Shifts a date by a signed number of days
pub fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate, TemporalError> {
    let shifted = if days >= 0 {
        date.checked_add_days(chrono::Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(chrono::Days::new(days.unsigned_abs()))
    };
    shifted.ok_or(TemporalError::DayOverflow { date, days })
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// A symmetric window of `radius_days` either side of `center`
    pub fn around(center: NaiveDate, radius_days: u32) -> Result<Self, TemporalError> {
        let radius = i64::from(radius_days);
        Self::new(shift_days(center, -radius)?, shift_days(center, radius)?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_months_is_calendar_based() {
        assert_eq!(add_months(date(2024, 1, 15), 14).unwrap(), date(2025, 3, 15));
        assert_eq!(add_months(date(2024, 1, 31), 1).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_add_months_overflow() {
        let result = add_months(NaiveDate::MAX, 1);
        assert!(matches!(result, Err(TemporalError::MonthOverflow { .. })));
    }

    #[test]
    fn test_window_around_is_inclusive() {
        let window = DateRange::around(date(2024, 3, 15), 10).unwrap();

        assert_eq!(window.start, date(2024, 3, 5));
        assert_eq!(window.end, date(2024, 3, 25));
        assert!(window.contains(date(2024, 3, 5)));
        assert!(window.contains(date(2024, 3, 25)));
        assert!(!window.contains(date(2024, 3, 26)));
        assert_eq!(window.days(), 20);
    }

    #[test]
    fn test_local_date_uses_jurisdiction() {
        let tz = Timezone::default();
        let late_evening_utc = Utc.with_ymd_and_hms(2024, 1, 10, 20, 0, 0).unwrap();

        assert_eq!(tz.local_date(late_evening_utc), date(2024, 1, 11));
    }
}
