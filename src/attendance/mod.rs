//! Attendance recording: the per-day state machine, wall-clock time parsing,
//! and bulk CSV import.
//!
//! # Example
//!
//! ```
//! use attendance_payroll::attendance::{AttendanceStateMachine, TransitionRequest};
//! use attendance_payroll::config::AttendancePolicy;
//! use attendance_payroll::models::{AttendanceRecord, AttendanceState};
//! use chrono::NaiveDate;
//!
//! let machine = AttendanceStateMachine::new(AttendancePolicy::default());
//! let today = AttendanceRecord::new("emp_001", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
//!
//! let request = TransitionRequest {
//!     work_type: Some("office".to_string()),
//!     location: Some("HQ".to_string()),
//!     ..TransitionRequest::at("09:00 AM")
//! };
//! let record = machine.check_in(&today, &request).unwrap();
//! assert_eq!(record.state(), AttendanceState::CheckedIn);
//! ```

mod clock;
mod import;
mod state_machine;
mod time_parse;

pub use clock::{Clock, FixedClock, SystemClock};
pub use import::{ImportReport, ParsedImport, ParsedRow, RowError, parse_attendance_csv};
pub use state_machine::{AttendanceStateMachine, TransitionRequest};
pub use time_parse::{anchor_time, parse_manual_time, parse_time_of_day};
