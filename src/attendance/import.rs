//! Bulk attendance import from CSV.
//!
//! The file carries one row per employee per day under the header
//!
//! ```text
//! Employee ID,Branch Code,Date,Check In,Check Out,Status,Leave Type,Remarks
//! ```
//!
//! Parsing never stops at a bad row. Each malformed row is reported with its
//! 1-based data-row number and the rest of the file is still read; only an
//! unreadable header fails the whole import.
//!
//! A blank `Status` is worked out from the check-in and check-out times with
//! the same late and half-day rule live transitions use, or `absent` when
//! there is no check-in.

use std::collections::HashMap;
use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AttendancePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus, CheckIn, CheckOut};

use super::state_machine::{actual_hours, derive_worked_status};
use super::time_parse::parse_manual_time;

/// Date layouts accepted in the `Date` column.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Columns that must appear in the header.
const REQUIRED_COLUMNS: &[&str] = &["Employee ID", "Date"];

#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(rename = "Employee ID")]
    employee_id: String,
    #[serde(rename = "Branch Code", default)]
    branch_code: Option<String>,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Check In", default)]
    check_in: Option<String>,
    #[serde(rename = "Check Out", default)]
    check_out: Option<String>,
    #[serde(rename = "Status", default)]
    status: Option<String>,
    #[serde(rename = "Leave Type", default)]
    leave_type: Option<String>,
    #[serde(rename = "Remarks", default)]
    remarks: Option<String>,
}

/// A problem with one data row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based data-row number (the header is not counted).
    pub row: usize,
    /// What was wrong with the row.
    pub message: String,
}

impl RowError {
    pub(crate) fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}

/// A row that parsed into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// 1-based data-row number.
    pub row: usize,
    /// The record the row describes.
    pub record: AttendanceRecord,
}

/// Outcome of parsing a file: good rows and per-row errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedImport {
    /// Rows that produced a record.
    pub rows: Vec<ParsedRow>,
    /// Rows that were rejected.
    pub errors: Vec<RowError>,
}

/// Summary of a committed import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Number of records written.
    pub imported: usize,
    /// Rejected rows in row order.
    pub errors: Vec<RowError>,
}

/// Parses an attendance CSV into records.
///
/// Duplicate (employee, date) keys within the file are rejected after the
/// first occurrence. Checks against already-stored records are left to the
/// caller.
///
/// # Errors
///
/// Returns [`EngineError::ImportError`] if the header cannot be read or a
/// required column is missing.
///
/// # Example
///
/// ```
/// use attendance_payroll::attendance::parse_attendance_csv;
/// use attendance_payroll::config::AttendancePolicy;
///
/// let csv = "Employee ID,Branch Code,Date,Check In,Check Out,Status,Leave Type,Remarks\n\
///            emp_001,BR01,2026-01-15,09:00 AM,05:00 PM,Present,,\n";
/// let parsed = parse_attendance_csv(csv.as_bytes(), &AttendancePolicy::default()).unwrap();
/// assert_eq!(parsed.rows.len(), 1);
/// assert!(parsed.errors.is_empty());
/// ```
pub fn parse_attendance_csv<R: Read>(
    input: R,
    policy: &AttendancePolicy,
) -> EngineResult<ParsedImport> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers().map_err(|e| EngineError::ImportError {
        message: format!("unreadable header: {}", e),
    })?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(EngineError::ImportError {
                message: format!("missing required column '{}'", column),
            });
        }
    }

    let mut parsed = ParsedImport::default();
    let mut first_seen: HashMap<(String, NaiveDate), usize> = HashMap::new();

    for (index, result) in reader.deserialize::<ImportRow>().enumerate() {
        let row = index + 1;
        let record = match result {
            Ok(raw) => build_record(raw, policy),
            Err(e) => Err(e.to_string()),
        };

        match record {
            Ok(record) => {
                let key = (record.employee_id.clone(), record.date);
                if let Some(first) = first_seen.get(&key) {
                    parsed.errors.push(RowError::new(
                        row,
                        format!(
                            "duplicate entry for employee '{}' on {} (first seen in row {})",
                            record.employee_id, record.date, first
                        ),
                    ));
                    continue;
                }
                first_seen.insert(key, row);
                parsed.rows.push(ParsedRow { row, record });
            }
            Err(message) => parsed.errors.push(RowError::new(row, message)),
        }
    }

    Ok(parsed)
}

fn build_record(raw: ImportRow, policy: &AttendancePolicy) -> Result<AttendanceRecord, String> {
    let employee_id = raw.employee_id.trim();
    if employee_id.is_empty() {
        return Err("missing Employee ID".to_string());
    }
    let date = parse_import_date(&raw.date)?;

    let mut record = AttendanceRecord::new(employee_id, date);
    record.branch_code = non_empty(raw.branch_code);
    record.leave_type = non_empty(raw.leave_type);
    record.remarks = non_empty(raw.remarks);

    let check_in = non_empty(raw.check_in)
        .map(|t| parse_manual_time(&t, date, policy.utc_offset).map_err(|e| e.to_string()))
        .transpose()?;
    let check_out = non_empty(raw.check_out)
        .map(|t| parse_manual_time(&t, date, policy.utc_offset).map_err(|e| e.to_string()))
        .transpose()?;

    match (check_in, check_out) {
        (None, Some(_)) => return Err("check-out given without a check-in".to_string()),
        (Some(start), Some(end)) if end < start => {
            return Err(format!("check-out {} is before check-in {}", end, start));
        }
        _ => {}
    }

    if let Some(time) = check_in {
        record.check_in = Some(CheckIn {
            time,
            work_type: None,
            location: record.branch_code.clone(),
            remarks: None,
        });
        record.working_hours.scheduled = policy.scheduled_hours;
    }
    if let Some(time) = check_out {
        record.check_out = Some(CheckOut { time, remarks: None });
        record.working_hours.actual = actual_hours(&record, time);
    }

    let actual = check_out.map(|_| record.working_hours.actual);
    record.status = match (non_empty(raw.status), check_in) {
        (Some(status), _) => status.parse::<AttendanceStatus>()?,
        (None, Some(time)) => derive_worked_status(policy, time, actual),
        (None, None) => AttendanceStatus::Absent,
    };

    Ok(record)
}

fn parse_import_date(input: &str) -> Result<NaiveDate, String> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| format!("invalid date '{}'", trimmed))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
