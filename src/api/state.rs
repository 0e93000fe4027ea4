//! Application state for the attendance and payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::attendance::{Clock, SystemClock};
use crate::config::ConfigLoader;
use crate::repository::{AttendanceRepository, PayrollRepository};
use crate::service::{AttendanceService, PayrollService};

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration, the two services, and the clock that decides
/// which day "today" is.
#[derive(Clone)]
pub struct AppState {
    /// The loaded engine configuration.
    config: Arc<ConfigLoader>,
    attendance: AttendanceService,
    payroll: PayrollService,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates application state over the given repositories, reading
    /// "today" from the system clock.
    pub fn new(
        config: ConfigLoader,
        attendance_repository: Arc<dyn AttendanceRepository>,
        payroll_repository: Arc<dyn PayrollRepository>,
    ) -> Self {
        let attendance =
            AttendanceService::new(attendance_repository.clone(), config.attendance().clone());
        let payroll = PayrollService::new(
            attendance_repository,
            payroll_repository,
            config.payroll().clone(),
        );

        Self {
            config: Arc::new(config),
            attendance,
            payroll,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the attendance service.
    pub fn attendance(&self) -> &AttendanceService {
        &self.attendance
    }

    /// Returns the payroll service.
    pub fn payroll(&self) -> &PayrollService {
        &self.payroll
    }

    /// Returns today's date in the configured offset.
    pub fn today(&self) -> NaiveDate {
        self.clock.today(self.config.attendance().utc_offset)
    }
}
