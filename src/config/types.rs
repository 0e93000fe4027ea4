//! Configuration types for attendance and payroll policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::{FixedOffset, NaiveTime, Offset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Attendance policy, loaded from `attendance.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendancePolicy {
    /// Offset applied to wall-clock times, written as `+05:30` or `-04:00`.
    #[serde(with = "utc_offset")]
    pub utc_offset: FixedOffset,
    /// Whether checking out while a break is open is allowed.
    ///
    /// When allowed, the break is left open on the record; it is never
    /// closed implicitly.
    #[serde(default = "default_allow_checkout_during_break")]
    pub allow_checkout_during_break: bool,
    /// Hours an employee is scheduled to work per day.
    #[serde(default = "default_scheduled_hours")]
    pub scheduled_hours: Decimal,
    /// Check-ins strictly after this time of day are marked late.
    #[serde(default)]
    pub late_after: Option<NaiveTime>,
    /// Days with fewer actual hours than this are marked half-day at check-out.
    #[serde(default)]
    pub half_day_below_hours: Option<Decimal>,
}

fn default_allow_checkout_during_break() -> bool {
    true
}

fn default_scheduled_hours() -> Decimal {
    Decimal::new(8, 0)
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            allow_checkout_during_break: default_allow_checkout_during_break(),
            scheduled_hours: default_scheduled_hours(),
            late_after: None,
            half_day_below_hours: None,
        }
    }
}

/// What proration does when the pay-period length is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPeriodFallback {
    /// Pay the full basic salary.
    #[default]
    FullSalary,
    /// Pay nothing.
    Zero,
}

/// Payroll policy, loaded from `payroll.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPolicy {
    /// Decimal places published currency figures are rounded to.
    #[serde(default = "default_currency_scale")]
    pub currency_scale: u32,
    /// Behaviour when the pay-period month length cannot be determined.
    #[serde(default)]
    pub missing_period_fallback: MissingPeriodFallback,
}

fn default_currency_scale() -> u32 {
    2
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            currency_scale: default_currency_scale(),
            missing_period_fallback: MissingPeriodFallback::default(),
        }
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// Attendance policy.
    attendance: AttendancePolicy,
    /// Payroll policy.
    payroll: PayrollPolicy,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(attendance: AttendancePolicy, payroll: PayrollPolicy) -> Self {
        Self {
            attendance,
            payroll,
        }
    }

    /// Returns the attendance policy.
    pub fn attendance(&self) -> &AttendancePolicy {
        &self.attendance
    }

    /// Returns the payroll policy.
    pub fn payroll(&self) -> &PayrollPolicy {
        &self.payroll
    }
}

/// Parses a `+HH:MM` / `-HH:MM` offset string.
pub(crate) fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Some(Utc.fix());
    }

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

mod utc_offset {
    use chrono::FixedOffset;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(offset: &FixedOffset, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(offset)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FixedOffset, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_utc_offset(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid UTC offset '{}'", raw)))
    }
}
