//! Calculation logic for the attendance and payroll engine.
//!
//! This module contains the pure functions that turn stored attendance into
//! pay: aggregation of per-day records into summary counts, salary and
//! deduction proration, and payslip assembly. Each calculation records an
//! [`AuditStep`](crate::models::AuditStep) describing its inputs, outputs
//! and reasoning.

mod aggregator;
mod payslip;
mod proration;

pub use aggregator::{
    AggregationResult, aggregate_period, build_attendance_report, summarize_attendance,
    summarize_range,
};
pub use payslip::{PayslipInput, assemble_payslip, calculate_payslip};
pub use proration::{ProrationInput, ProrationResult, calculate_proration};
