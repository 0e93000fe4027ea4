//! Core data models for the attendance and payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod calculation_result;
mod employee;
mod pay_period;
mod payslip;
mod summary;

pub use attendance::{
    AttendanceRecord, AttendanceState, AttendanceStatus, BreakEnd, BreakStart, BreakTime, CheckIn,
    CheckOut, Transition, WorkingHours,
};
pub use calculation_result::{AuditStep, AuditTrace, DataQualityFlag};
pub use employee::{BankDetails, Deductions, EmployeeIdentity, PayrollBase};
pub use pay_period::PayPeriod;
pub use payslip::{Payslip, ScaledDeductions};
pub use summary::{AttendanceReport, AttendanceSummary};
