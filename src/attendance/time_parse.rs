//! Parsing of free-text wall-clock times.
//!
//! Check-in and friends accept a manual time such as `"09:30 AM"` or
//! `"14:05"`. The text is parsed into a time of day and anchored to the
//! record's calendar date in the configured UTC offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};

use crate::error::{EngineError, EngineResult};

/// Accepted layouts, tried in order. 12-hour layouts come first so that
/// `"09:30 AM"` never half-matches a 24-hour layout.
const TIME_FORMATS: &[&str] = &[
    "%I:%M %p",
    "%I:%M:%S %p",
    "%I:%M%p",
    "%I:%M:%S%p",
    "%H:%M",
    "%H:%M:%S",
];

/// Parses a wall-clock string into a time of day.
///
/// Accepts 12-hour times with an AM/PM marker (any case, with or without a
/// space, dotted `a.m.` included) and 24-hour `HH:MM` or `HH:MM:SS`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTimeFormat`] carrying the raw input.
///
/// # Examples
///
/// ```
/// use attendance_payroll::attendance::parse_time_of_day;
/// use chrono::NaiveTime;
///
/// assert_eq!(
///     parse_time_of_day("09:30 PM").unwrap(),
///     NaiveTime::from_hms_opt(21, 30, 0).unwrap()
/// );
/// assert!(parse_time_of_day("25:00").is_err());
/// ```
pub fn parse_time_of_day(input: &str) -> EngineResult<NaiveTime> {
    let normalized = input.trim().to_uppercase().replace('.', "");

    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&normalized, format).ok())
        .ok_or_else(|| EngineError::InvalidTimeFormat {
            input: input.to_string(),
        })
}

/// Anchors a time of day to a calendar date in the given offset.
pub fn anchor_time(
    date: NaiveDate,
    time: NaiveTime,
    offset: FixedOffset,
) -> EngineResult<DateTime<FixedOffset>> {
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| EngineError::InvalidTimeFormat {
            input: format!("{} {}", date, time),
        })
}

/// Parses a manual time and anchors it to `date`.
///
/// ```
/// use attendance_payroll::attendance::parse_manual_time;
/// use chrono::{FixedOffset, NaiveDate};
///
/// let offset = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let time = parse_manual_time("9:05am", date, offset).unwrap();
/// assert_eq!(time.to_rfc3339(), "2026-01-15T09:05:00+05:30");
/// ```
pub fn parse_manual_time(
    input: &str,
    date: NaiveDate,
    offset: FixedOffset,
) -> EngineResult<DateTime<FixedOffset>> {
    let time = parse_time_of_day(input)?;
    anchor_time(date, time, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_twelve_hour_with_space() {
        assert_eq!(parse_time_of_day("09:30 AM").unwrap(), hms(9, 30, 0));
        assert_eq!(parse_time_of_day("09:30 PM").unwrap(), hms(21, 30, 0));
    }

    #[test]
    fn test_twelve_hour_lowercase_without_space() {
        assert_eq!(parse_time_of_day("09:30am").unwrap(), hms(9, 30, 0));
        assert_eq!(parse_time_of_day("05:45pm").unwrap(), hms(17, 45, 0));
    }

    #[test]
    fn test_twelve_hour_dotted_marker() {
        assert_eq!(parse_time_of_day("07:15 p.m.").unwrap(), hms(19, 15, 0));
    }

    #[test]
    fn test_noon_and_midnight() {
        assert_eq!(parse_time_of_day("12:00 PM").unwrap(), hms(12, 0, 0));
        assert_eq!(parse_time_of_day("12:00 AM").unwrap(), hms(0, 0, 0));
    }

    #[test]
    fn test_twelve_hour_with_seconds() {
        assert_eq!(parse_time_of_day("10:01:02 AM").unwrap(), hms(10, 1, 2));
    }

    #[test]
    fn test_twenty_four_hour() {
        assert_eq!(parse_time_of_day("14:05").unwrap(), hms(14, 5, 0));
        assert_eq!(parse_time_of_day("14:05:30").unwrap(), hms(14, 5, 30));
        assert_eq!(parse_time_of_day("  08:00  ").unwrap(), hms(8, 0, 0));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        for input in ["", "noon", "25:00", "13:30 PM", "9", "09:61", "09:30 XM"] {
            match parse_time_of_day(input) {
                Err(EngineError::InvalidTimeFormat { input: raw }) => assert_eq!(raw, input),
                other => panic!("Expected InvalidTimeFormat for '{}', got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_anchor_time_carries_offset_and_date() {
        let offset = FixedOffset::west_opt(4 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let anchored = anchor_time(date, hms(8, 0, 0), offset).unwrap();
        assert_eq!(anchored.to_rfc3339(), "2026-03-09T08:00:00-04:00");
        assert_eq!(anchored.date_naive(), date);
    }
}
