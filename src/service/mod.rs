//! Services that tie the pure engine to the repositories.
//!
//! [`AttendanceService`] records transitions and imports; [`PayrollService`]
//! computes payslips from what has been recorded.

mod attendance;
mod payroll;

pub use attendance::AttendanceService;
pub use payroll::PayrollService;
