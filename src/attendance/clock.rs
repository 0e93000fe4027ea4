//! Source of "today" for attendance transitions.

use chrono::{FixedOffset, NaiveDate, Utc};

/// Supplies the current calendar date in a given offset.
pub trait Clock: Send + Sync {
    /// Returns today's date as seen in `offset`.
    fn today(&self, offset: FixedOffset) -> NaiveDate;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self, offset: FixedOffset) -> NaiveDate {
        Utc::now().with_timezone(&offset).date_naive()
    }
}

/// Always returns the same date. Used in tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self, _offset: FixedOffset) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_ignores_offset() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let clock = FixedClock(date);
        assert_eq!(clock.today(FixedOffset::east_opt(14 * 3600).unwrap()), date);
        assert_eq!(clock.today(FixedOffset::west_opt(12 * 3600).unwrap()), date);
    }

    #[test]
    fn test_system_clock_offsets_differ_by_at_most_one_day() {
        let clock = SystemClock;
        let east = clock.today(FixedOffset::east_opt(14 * 3600).unwrap());
        let west = clock.today(FixedOffset::west_opt(12 * 3600).unwrap());
        assert!((east - west).num_days().abs() <= 1);
    }
}
