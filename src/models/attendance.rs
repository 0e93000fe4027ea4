//! Attendance record model and the derived per-day attendance state.
//!
//! An [`AttendanceRecord`] holds one employee's attendance for one calendar
//! day. Its [`AttendanceState`] is never stored: it is computed from which
//! sub-fields are populated by [`AttendanceRecord::state`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The recorded outcome of an attendance day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Worked the day.
    Present,
    /// Did not attend.
    Absent,
    /// Checked in after the configured late threshold.
    Late,
    /// Worked less than the configured half-day threshold.
    HalfDay,
    /// On leave.
    Leave,
    /// Public or company holiday.
    Holiday,
    /// Weekly off day.
    Weekend,
    /// Attendance approved by a manager after review.
    Approved,
    /// Attendance rejected by a manager after review.
    Rejected,
}

impl AttendanceStatus {
    /// Returns the snake_case name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::HalfDay => "half_day",
            AttendanceStatus::Leave => "leave",
            AttendanceStatus::Holiday => "holiday",
            AttendanceStatus::Weekend => "weekend",
            AttendanceStatus::Approved => "approved",
            AttendanceStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    /// Parses a status leniently: case-insensitive, with spaces and hyphens
    /// accepted in place of underscores ("Half Day", "half-day").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "late" => Ok(AttendanceStatus::Late),
            "half_day" | "halfday" => Ok(AttendanceStatus::HalfDay),
            "leave" => Ok(AttendanceStatus::Leave),
            "holiday" => Ok(AttendanceStatus::Holiday),
            "weekend" => Ok(AttendanceStatus::Weekend),
            "approved" => Ok(AttendanceStatus::Approved),
            "rejected" => Ok(AttendanceStatus::Rejected),
            _ => Err(format!("unknown attendance status '{}'", s.trim())),
        }
    }
}

/// The attendance state of a day, derived from a record's populated fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceState {
    /// No check-in recorded yet.
    NotCheckedIn,
    /// Checked in and working.
    CheckedIn,
    /// A break has started and not ended.
    OnBreak,
    /// Checked out; terminal for the day.
    CheckedOut,
}

impl fmt::Display for AttendanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttendanceState::NotCheckedIn => "not checked in",
            AttendanceState::CheckedIn => "checked in",
            AttendanceState::OnBreak => "on break",
            AttendanceState::CheckedOut => "checked out",
        })
    }
}

/// One of the four attendance transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Start of the working day.
    CheckIn,
    /// Start of the day's break.
    StartBreak,
    /// End of the day's break.
    EndBreak,
    /// End of the working day.
    CheckOut,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transition::CheckIn => "check in",
            Transition::StartBreak => "start break",
            Transition::EndBreak => "end break",
            Transition::CheckOut => "check out",
        })
    }
}

/// Check-in details for the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    /// When the employee checked in.
    pub time: DateTime<FixedOffset>,
    /// The kind of work (e.g. "office", "remote", "field").
    #[serde(default)]
    pub work_type: Option<String>,
    /// Where the employee checked in from.
    #[serde(default)]
    pub location: Option<String>,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Check-out details for the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOut {
    /// When the employee checked out.
    pub time: DateTime<FixedOffset>,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Start of a break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakStart {
    /// When the break started.
    pub time: DateTime<FixedOffset>,
    /// Where the break was taken.
    #[serde(default)]
    pub location: Option<String>,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: Option<String>,
}

/// End of a break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEnd {
    /// When the break ended.
    pub time: DateTime<FixedOffset>,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: Option<String>,
}

/// The day's break. A record holds at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakTime {
    /// Break start.
    pub start: BreakStart,
    /// Break end; `None` while the break is open.
    #[serde(default)]
    pub end: Option<BreakEnd>,
}

impl BreakTime {
    /// Returns true if the break has started but not ended.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// Scheduled and actual working hours for the day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// Hours the employee was scheduled to work.
    pub scheduled: Decimal,
    /// Hours actually worked (known once checked out).
    pub actual: Decimal,
}

/// One employee's attendance for one calendar day.
///
/// # Example
///
/// ```
/// use attendance_payroll::models::{AttendanceRecord, AttendanceState, AttendanceStatus};
/// use chrono::NaiveDate;
///
/// let record = AttendanceRecord::new("emp_001", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
/// assert_eq!(record.state(), AttendanceState::NotCheckedIn);
/// assert_eq!(record.status, AttendanceStatus::Absent);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee this record belongs to.
    pub employee_id: String,
    /// The calendar day; unique per employee.
    pub date: NaiveDate,
    /// Branch the attendance was recorded at.
    #[serde(default)]
    pub branch_code: Option<String>,
    /// Check-in details.
    #[serde(default)]
    pub check_in: Option<CheckIn>,
    /// Check-out details.
    #[serde(default)]
    pub check_out: Option<CheckOut>,
    /// The day's break.
    #[serde(default)]
    pub break_time: Option<BreakTime>,
    /// The day's outcome.
    pub status: AttendanceStatus,
    /// Leave category when `status` is leave.
    #[serde(default)]
    pub leave_type: Option<String>,
    /// Day-level remarks (from bulk import).
    #[serde(default)]
    pub remarks: Option<String>,
    /// Scheduled and actual hours.
    #[serde(default)]
    pub working_hours: WorkingHours,
}

impl AttendanceRecord {
    /// Creates an empty record for an employee and day.
    pub fn new(employee_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            branch_code: None,
            check_in: None,
            check_out: None,
            break_time: None,
            status: AttendanceStatus::Absent,
            leave_type: None,
            remarks: None,
            working_hours: WorkingHours::default(),
        }
    }

    /// Derives the day's attendance state from the populated fields.
    ///
    /// A check-out wins over an open break, so a day checked out while on
    /// break reads as [`AttendanceState::CheckedOut`].
    pub fn state(&self) -> AttendanceState {
        if self.check_in.is_none() {
            AttendanceState::NotCheckedIn
        } else if self.check_out.is_some() {
            AttendanceState::CheckedOut
        } else if self.break_time.as_ref().is_some_and(BreakTime::is_open) {
            AttendanceState::OnBreak
        } else {
            AttendanceState::CheckedIn
        }
    }

    /// Returns the latest event time recorded on the day, if any.
    pub fn last_event_time(&self) -> Option<DateTime<FixedOffset>> {
        let break_start = self.break_time.as_ref().map(|b| b.start.time);
        let break_end = self
            .break_time
            .as_ref()
            .and_then(|b| b.end.as_ref().map(|e| e.time));

        [
            self.check_in.as_ref().map(|c| c.time),
            break_start,
            break_end,
            self.check_out.as_ref().map(|c| c.time),
        ]
        .into_iter()
        .flatten()
        .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        offset()
            .with_ymd_and_hms(2026, 1, 15, hour, minute, 0)
            .unwrap()
    }

    fn checked_in_record() -> AttendanceRecord {
        let mut record =
            AttendanceRecord::new("emp_001", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        record.check_in = Some(CheckIn {
            time: at(9, 0),
            work_type: Some("office".to_string()),
            location: Some("HQ".to_string()),
            remarks: None,
        });
        record
    }

    #[test]
    fn test_new_record_is_not_checked_in() {
        let record =
            AttendanceRecord::new("emp_001", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        assert_eq!(record.state(), AttendanceState::NotCheckedIn);
        assert!(record.last_event_time().is_none());
    }

    #[test]
    fn test_state_checked_in() {
        assert_eq!(checked_in_record().state(), AttendanceState::CheckedIn);
    }

    #[test]
    fn test_state_on_break_when_break_open() {
        let mut record = checked_in_record();
        record.break_time = Some(BreakTime {
            start: BreakStart {
                time: at(12, 0),
                location: None,
                remarks: None,
            },
            end: None,
        });
        assert_eq!(record.state(), AttendanceState::OnBreak);
    }

    #[test]
    fn test_state_back_to_checked_in_after_break_closed() {
        let mut record = checked_in_record();
        record.break_time = Some(BreakTime {
            start: BreakStart {
                time: at(12, 0),
                location: None,
                remarks: None,
            },
            end: Some(BreakEnd {
                time: at(12, 30),
                remarks: None,
            }),
        });
        assert_eq!(record.state(), AttendanceState::CheckedIn);
        assert_eq!(record.last_event_time(), Some(at(12, 30)));
    }

    #[test]
    fn test_checkout_takes_precedence_over_open_break() {
        let mut record = checked_in_record();
        record.break_time = Some(BreakTime {
            start: BreakStart {
                time: at(12, 0),
                location: None,
                remarks: None,
            },
            end: None,
        });
        record.check_out = Some(CheckOut {
            time: at(17, 0),
            remarks: None,
        });
        assert_eq!(record.state(), AttendanceState::CheckedOut);
        assert_eq!(record.last_event_time(), Some(at(17, 0)));
    }

    #[test]
    fn test_status_parses_leniently() {
        assert_eq!(
            "Half Day".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            "half-day".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            " PRESENT ".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::Present
        );
        assert!("sick".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"half_day\""
        );
        let status: AttendanceStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, AttendanceStatus::Approved);
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let json = r#"{
            "employee_id": "emp_002",
            "date": "2026-01-16",
            "status": "leave",
            "leave_type": "casual"
        }"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, AttendanceStatus::Leave);
        assert_eq!(record.leave_type.as_deref(), Some("casual"));
        assert!(record.check_in.is_none());
        assert_eq!(record.working_hours, WorkingHours::default());
    }
}
