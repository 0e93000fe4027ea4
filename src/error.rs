//! Error types for the attendance and payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while recording attendance or
//! computing pay. Data-quality conditions (zero salary, no attendance) are
//! not errors: they degrade to zero-valued results carrying a
//! [`DataQualityFlag`](crate::models::DataQualityFlag).

use chrono::{DateTime, FixedOffset, NaiveDate};
use thiserror::Error;

use crate::models::{AttendanceState, Transition};

/// The main error type for the engine.
///
/// Every failure is scoped to a single employee, day or pay period; none of
/// them is fatal to the process.
///
/// # Example
///
/// ```
/// use attendance_payroll::error::EngineError;
///
/// let error = EngineError::InvalidTimeFormat {
///     input: "25:99".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid time format: '25:99'");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The requested attendance transition is not legal from the current state.
    #[error("Cannot {action} while {state}: {message}")]
    InvalidTransition {
        /// The transition that was attempted.
        action: Transition,
        /// The state the record was in.
        state: AttendanceState,
        /// Why the transition was refused.
        message: String,
    },

    /// A manual time override could not be parsed as a time of day.
    #[error("Invalid time format: '{input}'")]
    InvalidTimeFormat {
        /// The raw input that failed to parse.
        input: String,
    },

    /// A field required by the operation was missing or blank.
    #[error("Missing required field: {field}")]
    MissingRequiredField {
        /// The name of the missing field.
        field: String,
    },

    /// The transition time precedes an event already recorded for the day.
    #[error("Cannot {action} at {time}: earlier than the last recorded event at {previous}")]
    OutOfOrderEvent {
        /// The transition that was attempted.
        action: Transition,
        /// The requested event time.
        time: DateTime<FixedOffset>,
        /// The latest event already on the record.
        previous: DateTime<FixedOffset>,
    },

    /// Another writer committed a change to the same record first.
    #[error("Attendance record for employee '{employee_id}' on {date} was modified concurrently")]
    ConcurrentModification {
        /// The employee owning the record.
        employee_id: String,
        /// The calendar day of the record.
        date: NaiveDate,
    },

    /// The day belongs to a pay period that has been finalized.
    #[error("Attendance for employee '{employee_id}' on {date} belongs to a finalized pay period")]
    PeriodFinalized {
        /// The employee owning the record.
        employee_id: String,
        /// The calendar day of the record.
        date: NaiveDate,
    },

    /// A pay period was constructed from an invalid month or year.
    #[error("Invalid pay period: month {month}, year {year}")]
    InvalidPayPeriod {
        /// The month supplied.
        month: u32,
        /// The year supplied.
        year: i32,
    },

    /// No employee identity is known for the given id.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The employee id that was looked up.
        employee_id: String,
    },

    /// No payroll base is configured for the given employee.
    #[error("Payroll not found for employee: {employee_id}")]
    PayrollNotFound {
        /// The employee id that was looked up.
        employee_id: String,
    },

    /// A bulk import could not be read at all.
    #[error("Failed to read attendance import: {message}")]
    ImportError {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
