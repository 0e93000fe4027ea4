//! Pay period model.
//!
//! A [`PayPeriod`] is a calendar month of a year. Its length in days comes
//! from the civil calendar, never from the number of attendance records.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A calendar month for which payroll is computed.
///
/// # Example
///
/// ```
/// use attendance_payroll::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(2, 2024).unwrap();
/// assert_eq!(period.total_days_in_month(), 29);
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The month, 1 through 12.
    pub month: u32,
    /// The calendar year.
    pub year: i32,
}

impl PayPeriod {
    /// Creates a pay period, validating the month and year.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPayPeriod`] when the month is outside
    /// 1..=12 or the year is outside the range chrono can represent.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidPayPeriod { month, year });
        }
        Ok(Self { month, year })
    }

    /// Returns the pay period whose month contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    /// Returns the pay period for the month before the one containing `date`.
    ///
    /// Payroll is usually run for the month prior to the current one.
    ///
    /// ```
    /// use attendance_payroll::models::PayPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let period = PayPeriod::preceding(NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
    /// assert_eq!((period.month, period.year), (12, 2025));
    /// ```
    pub fn preceding(date: NaiveDate) -> Self {
        if date.month() == 1 {
            Self {
                month: 12,
                year: date.year() - 1,
            }
        } else {
            Self {
                month: date.month() - 1,
                year: date.year(),
            }
        }
    }

    /// Returns the first day of the month, if the period is valid.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Returns the last day of the month, if the period is valid.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.start_date()
            .and_then(|start| start.checked_add_months(Months::new(1)))
            .and_then(|next| next.pred_opt())
    }

    /// Returns the number of calendar days in the month.
    ///
    /// Returns 0 for a period whose month or year is out of range (only
    /// possible for values deserialized without validation).
    pub fn total_days_in_month(&self) -> u32 {
        self.end_date().map(|end| end.day()).unwrap_or(0)
    }

    /// Checks if a date falls within the month (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_total_days_in_thirty_day_month() {
        assert_eq!(PayPeriod::new(4, 2026).unwrap().total_days_in_month(), 30);
    }

    #[test]
    fn test_total_days_in_thirty_one_day_month() {
        assert_eq!(PayPeriod::new(12, 2026).unwrap().total_days_in_month(), 31);
    }

    #[test]
    fn test_total_days_in_february_leap_and_common_year() {
        assert_eq!(PayPeriod::new(2, 2024).unwrap().total_days_in_month(), 29);
        assert_eq!(PayPeriod::new(2, 2026).unwrap().total_days_in_month(), 28);
        assert_eq!(PayPeriod::new(2, 1900).unwrap().total_days_in_month(), 28);
        assert_eq!(PayPeriod::new(2, 2000).unwrap().total_days_in_month(), 29);
    }

    #[test]
    fn test_containing_period() {
        let period = PayPeriod::containing(make_date(2026, 2, 28));
        assert_eq!((period.month, period.year), (2, 2026));
        assert!(period.contains_date(make_date(2026, 2, 1)));
    }

    #[test]
    fn test_invalid_month_rejected() {
        match PayPeriod::new(13, 2026) {
            Err(EngineError::InvalidPayPeriod { month, year }) => {
                assert_eq!(month, 13);
                assert_eq!(year, 2026);
            }
            other => panic!("Expected InvalidPayPeriod, got {:?}", other),
        }
        assert!(PayPeriod::new(0, 2026).is_err());
    }

    #[test]
    fn test_unvalidated_period_has_zero_days() {
        let period: PayPeriod = serde_json::from_str(r#"{"month": 14, "year": 2026}"#).unwrap();
        assert_eq!(period.total_days_in_month(), 0);
        assert!(period.start_date().is_none());
    }

    #[test]
    fn test_start_and_end_dates() {
        let period = PayPeriod::new(1, 2026).unwrap();
        assert_eq!(period.start_date(), Some(make_date(2026, 1, 1)));
        assert_eq!(period.end_date(), Some(make_date(2026, 1, 31)));
    }

    #[test]
    fn test_contains_date_boundaries() {
        let period = PayPeriod::new(3, 2026).unwrap();
        assert!(period.contains_date(make_date(2026, 3, 1)));
        assert!(period.contains_date(make_date(2026, 3, 31)));
        assert!(!period.contains_date(make_date(2026, 2, 28)));
        assert!(!period.contains_date(make_date(2025, 3, 15)));
    }

    #[test]
    fn test_preceding_wraps_year() {
        let period = PayPeriod::preceding(make_date(2026, 1, 31));
        assert_eq!(period, PayPeriod::new(12, 2025).unwrap());

        let period = PayPeriod::preceding(make_date(2026, 7, 1));
        assert_eq!(period, PayPeriod::new(6, 2026).unwrap());
    }

    #[test]
    fn test_serialize_pay_period() {
        let period = PayPeriod::new(10, 2026).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, r#"{"month":10,"year":2026}"#);
    }
}
