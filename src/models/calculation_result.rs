//! Calculation trace and data-quality models.
//!
//! Every calculation records the steps it took as [`AuditStep`]s so that a
//! payslip can explain its own figures. Conditions that make a result
//! suspicious without making it wrong are reported as [`DataQualityFlag`]s.

use serde::{Deserialize, Serialize};

/// A single step in a calculation trace.
///
/// Each step captures the input, output, and reasoning for a rule
/// application. Steps contain no timestamps or random identifiers, so the
/// same inputs always produce the same trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The ordered steps of a calculation.
///
/// # Example
///
/// ```
/// use attendance_payroll::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// assert_eq!(trace.next_step_number(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
}

impl AuditTrace {
    /// Returns the number the next appended step should carry.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    /// Appends a step.
    pub fn push(&mut self, step: AuditStep) {
        self.steps.push(step);
    }
}

/// A condition that zeroed or substituted a result without being an error.
///
/// Callers use these to tell "legitimately zero" apart from "insufficient
/// data".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQualityFlag {
    /// The basic salary is zero or negative; pay degraded to zero.
    BasicSalaryNotPositive,
    /// No present days in the period; gross pay is zero.
    NoPresentDays,
    /// The pay-period length was unavailable; the configured fallback was used.
    PayPeriodUnavailable,
    /// No attendance records exist for the period.
    NoAttendanceRecords,
    /// A pay figure exceeded the decimal range; pay degraded to zero.
    AmountOutOfRange,
}

impl DataQualityFlag {
    /// Returns a stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            DataQualityFlag::BasicSalaryNotPositive => "basic_salary_not_positive",
            DataQualityFlag::NoPresentDays => "no_present_days",
            DataQualityFlag::PayPeriodUnavailable => "pay_period_unavailable",
            DataQualityFlag::NoAttendanceRecords => "no_attendance_records",
            DataQualityFlag::AmountOutOfRange => "amount_out_of_range",
        }
    }

    /// Returns a human-readable description.
    pub fn message(&self) -> &'static str {
        match self {
            DataQualityFlag::BasicSalaryNotPositive => {
                "Basic salary is zero or negative; pay and deductions degraded to zero"
            }
            DataQualityFlag::NoPresentDays => "No present days recorded; gross pay is zero",
            DataQualityFlag::PayPeriodUnavailable => {
                "Days in the pay-period month could not be determined; fallback applied"
            }
            DataQualityFlag::NoAttendanceRecords => {
                "No attendance records exist for the pay period"
            }
            DataQualityFlag::AmountOutOfRange => {
                "Salary or deduction figures are too large to compute; pay degraded to zero"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_serialization_matches_code() {
        for flag in [
            DataQualityFlag::BasicSalaryNotPositive,
            DataQualityFlag::NoPresentDays,
            DataQualityFlag::PayPeriodUnavailable,
            DataQualityFlag::NoAttendanceRecords,
            DataQualityFlag::AmountOutOfRange,
        ] {
            let json = serde_json::to_string(&flag).unwrap();
            assert_eq!(json, format!("\"{}\"", flag.code()));
        }
    }

    #[test]
    fn test_trace_step_numbering() {
        let mut trace = AuditTrace::default();
        trace.push(AuditStep {
            step_number: trace.next_step_number(),
            rule_id: "attendance_summary".to_string(),
            rule_name: "Attendance Summary".to_string(),
            input: serde_json::json!({}),
            output: serde_json::json!({}),
            reasoning: String::new(),
        });
        assert_eq!(trace.steps[0].step_number, 1);
        assert_eq!(trace.next_step_number(), 2);
    }
}
