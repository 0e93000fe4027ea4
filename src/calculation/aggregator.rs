//! Attendance aggregation.
//!
//! Reduces per-day [`AttendanceRecord`]s into [`AttendanceSummary`] counts.
//! `total_days` is the number of records considered. Calendar days with no
//! record are left out entirely rather than counted as absent; the report
//! exposes them separately as `unrecorded_days`.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::{
    AttendanceRecord, AttendanceReport, AttendanceStatus, AttendanceSummary, AuditStep, PayPeriod,
};

/// The result of aggregating one pay period, including the audit step.
#[derive(Debug, Clone)]
pub struct AggregationResult {
    /// Counts over the period's records.
    pub summary: AttendanceSummary,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Counts statuses over the given records.
///
/// Present counts `present` and `approved`; absent counts `absent` and
/// `rejected`. Leave, holiday and weekend records add to `total_days` only.
///
/// # Examples
///
/// ```
/// use attendance_payroll::calculation::summarize_attendance;
/// use attendance_payroll::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::NaiveDate;
///
/// let mut monday = AttendanceRecord::new("emp_001", NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
/// monday.status = AttendanceStatus::Present;
/// let tuesday = AttendanceRecord::new("emp_001", NaiveDate::from_ymd_opt(2026, 1, 13).unwrap());
///
/// let summary = summarize_attendance(&[monday, tuesday]);
/// assert_eq!(summary.total_days, 2);
/// assert_eq!(summary.present_days, 1);
/// assert_eq!(summary.attendance_percentage, 50);
/// ```
pub fn summarize_attendance<'a, I>(records: I) -> AttendanceSummary
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut summary = AttendanceSummary::default();

    for record in records {
        summary.total_days += 1;
        match record.status {
            AttendanceStatus::Present | AttendanceStatus::Approved => summary.present_days += 1,
            AttendanceStatus::Absent | AttendanceStatus::Rejected => summary.absent_days += 1,
            AttendanceStatus::Late => summary.late_days += 1,
            AttendanceStatus::HalfDay => summary.half_days += 1,
            AttendanceStatus::Leave | AttendanceStatus::Holiday | AttendanceStatus::Weekend => {}
        }
    }

    summary.attendance_percentage = attendance_percentage(summary.present_days, summary.total_days);
    summary
}

/// Summarizes one employee's records between two dates, inclusive.
///
/// Records belonging to other employees are ignored.
pub fn summarize_range(
    employee_id: &str,
    records: &[AttendanceRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> AttendanceSummary {
    summarize_attendance(
        records
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date >= start && r.date <= end),
    )
}

/// Builds an employee's attendance report for a pay period.
///
/// `overall` covers every record given for the employee, `current_period`
/// only those inside `period`.
pub fn build_attendance_report(
    employee_id: &str,
    records: &[AttendanceRecord],
    period: PayPeriod,
) -> AttendanceReport {
    let own: Vec<&AttendanceRecord> = records
        .iter()
        .filter(|r| r.employee_id == employee_id)
        .collect();

    let in_period: Vec<&AttendanceRecord> = own
        .iter()
        .copied()
        .filter(|r| period.contains_date(r.date))
        .collect();

    let recorded_days: HashSet<NaiveDate> = in_period.iter().map(|r| r.date).collect();
    let unrecorded_days = period
        .total_days_in_month()
        .saturating_sub(recorded_days.len() as u32);

    AttendanceReport {
        employee_id: employee_id.to_string(),
        overall: summarize_attendance(own.iter().copied()),
        current_period: summarize_attendance(in_period.iter().copied()),
        unrecorded_days,
    }
}

/// Aggregates one employee's records for a pay period and records an audit
/// step.
pub fn aggregate_period(
    employee_id: &str,
    records: &[AttendanceRecord],
    period: PayPeriod,
    step_number: u32,
) -> AggregationResult {
    let summary = summarize_attendance(
        records
            .iter()
            .filter(|r| r.employee_id == employee_id && period.contains_date(r.date)),
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_summary".to_string(),
        rule_name: "Attendance Summary".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "month": period.month,
            "year": period.year,
            "records_supplied": records.len()
        }),
        output: serde_json::json!({
            "total_days": summary.total_days,
            "present_days": summary.present_days,
            "absent_days": summary.absent_days,
            "late_days": summary.late_days,
            "half_days": summary.half_days,
            "attendance_percentage": summary.attendance_percentage
        }),
        reasoning: format!(
            "{} present of {} recorded days in {:02}/{} ({}%)",
            summary.present_days,
            summary.total_days,
            period.month,
            period.year,
            summary.attendance_percentage
        ),
    };

    AggregationResult {
        summary,
        audit_step,
    }
}

/// `round(present / total * 100)`, half away from zero; 0 when `total` is 0.
fn attendance_percentage(present_days: u32, total_days: u32) -> u32 {
    if total_days == 0 {
        return 0;
    }
    let present = u64::from(present_days);
    let total = u64::from(total_days);
    ((present * 200 + total) / (2 * total)) as u32
}
