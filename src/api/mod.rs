//! HTTP API module for the attendance and payroll engine.
//!
//! This module provides the REST endpoints for recording attendance
//! transitions, importing attendance, and reading payroll bases, attendance
//! summaries and payslips.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{EmployeePeriodQuery, PeriodQuery, TransitionBody};
pub use response::{ApiError, ApiErrorResponse, FinalizeResponse, PayslipOutcome};
pub use state::AppState;
