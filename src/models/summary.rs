//! Attendance summary model.

use serde::{Deserialize, Serialize};

/// Counts derived from a set of attendance records.
///
/// Never persisted as a source of truth; always recomputed by
/// [`summarize_attendance`](crate::calculation::summarize_attendance).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Number of records considered (not calendar days).
    pub total_days: u32,
    /// Records with status present or approved.
    pub present_days: u32,
    /// Records with status absent or rejected.
    pub absent_days: u32,
    /// Records with status late.
    pub late_days: u32,
    /// Records with status half_day.
    pub half_days: u32,
    /// `round(present_days / total_days * 100)`, or 0 with no records.
    pub attendance_percentage: u32,
}

/// An aggregation over an employee's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceReport {
    /// The employee the report describes.
    pub employee_id: String,
    /// Summary over every record supplied.
    pub overall: AttendanceSummary,
    /// Summary restricted to the period of interest.
    pub current_period: AttendanceSummary,
    /// Calendar days in the period that have no record at all.
    ///
    /// These are excluded from `total_days`, not counted as absent.
    pub unrecorded_days: u32,
}
