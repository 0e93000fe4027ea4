//! Attendance orchestration: load, transition, commit.

use std::io::Read;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::attendance::{
    AttendanceStateMachine, ImportReport, RowError, TransitionRequest, parse_attendance_csv,
};
use crate::calculation::build_attendance_report;
use crate::config::AttendancePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceReport, PayPeriod, Transition};
use crate::repository::{AttendanceRepository, UNWRITTEN_VERSION, VersionedRecord};

/// Applies attendance transitions against a repository.
///
/// Each transition reads the day's record and its version, runs the state
/// machine, and commits with a compare-and-swap on that version. If another
/// writer committed in between, the call fails with
/// [`EngineError::ConcurrentModification`] and nothing is overwritten.
#[derive(Clone)]
pub struct AttendanceService {
    repository: Arc<dyn AttendanceRepository>,
    machine: AttendanceStateMachine,
}

impl AttendanceService {
    /// Creates a service over `repository` using `policy`.
    pub fn new(repository: Arc<dyn AttendanceRepository>, policy: AttendancePolicy) -> Self {
        Self {
            repository,
            machine: AttendanceStateMachine::new(policy),
        }
    }

    /// Returns the attendance policy in force.
    pub fn policy(&self) -> &AttendancePolicy {
        self.machine.policy()
    }

    /// Applies one transition to an employee's record for `date`.
    ///
    /// # Errors
    ///
    /// Any error from the state machine, plus
    /// [`EngineError::PeriodFinalized`] and
    /// [`EngineError::ConcurrentModification`] from the commit.
    pub fn transition(
        &self,
        employee_id: &str,
        date: NaiveDate,
        transition: Transition,
        request: &TransitionRequest,
    ) -> EngineResult<AttendanceRecord> {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() {
            return Err(EngineError::MissingRequiredField {
                field: "employee_id".to_string(),
            });
        }
        if self.repository.is_finalized(employee_id, date)? {
            return Err(EngineError::PeriodFinalized {
                employee_id: employee_id.to_string(),
                date,
            });
        }

        let (current, version) = match self.repository.get(employee_id, date)? {
            Some(VersionedRecord { record, version }) => (record, version),
            None => (AttendanceRecord::new(employee_id, date), UNWRITTEN_VERSION),
        };

        let updated = self.machine.apply(&current, transition, request)?;
        let new_version = self.repository.compare_and_swap(updated.clone(), version)?;

        info!(
            employee_id = %employee_id,
            date = %date,
            transition = %transition,
            state = ?updated.state(),
            version = new_version,
            "Attendance transition committed"
        );
        Ok(updated)
    }

    /// Records a check-in.
    pub fn check_in(
        &self,
        employee_id: &str,
        date: NaiveDate,
        request: &TransitionRequest,
    ) -> EngineResult<AttendanceRecord> {
        self.transition(employee_id, date, Transition::CheckIn, request)
    }

    /// Starts the day's break.
    pub fn start_break(
        &self,
        employee_id: &str,
        date: NaiveDate,
        request: &TransitionRequest,
    ) -> EngineResult<AttendanceRecord> {
        self.transition(employee_id, date, Transition::StartBreak, request)
    }

    /// Ends the day's break.
    pub fn end_break(
        &self,
        employee_id: &str,
        date: NaiveDate,
        request: &TransitionRequest,
    ) -> EngineResult<AttendanceRecord> {
        self.transition(employee_id, date, Transition::EndBreak, request)
    }

    /// Records a check-out.
    pub fn check_out(
        &self,
        employee_id: &str,
        date: NaiveDate,
        request: &TransitionRequest,
    ) -> EngineResult<AttendanceRecord> {
        self.transition(employee_id, date, Transition::CheckOut, request)
    }

    /// Lists an employee's records for a pay period.
    pub fn records_for_period(
        &self,
        employee_id: &str,
        period: PayPeriod,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        self.repository.records_for_period(employee_id, period)
    }

    /// Builds an employee's attendance report for a pay period.
    pub fn report(&self, employee_id: &str, period: PayPeriod) -> EngineResult<AttendanceReport> {
        let records = self.repository.records_for_employee(employee_id)?;
        Ok(build_attendance_report(employee_id, &records, period))
    }

    /// Imports attendance from CSV.
    ///
    /// Rows whose key is already stored or falls in a finalized period are
    /// reported alongside parse errors; every other row is committed.
    ///
    /// # Errors
    ///
    /// [`EngineError::ImportError`] if the header is unreadable.
    pub fn import_csv<R: Read>(&self, input: R) -> EngineResult<ImportReport> {
        let parsed = parse_attendance_csv(input, self.policy())?;
        let mut report = ImportReport {
            imported: 0,
            errors: parsed.errors,
        };

        for row in parsed.rows {
            let record = row.record;
            let employee_id = record.employee_id.clone();
            let date = record.date;

            match self.repository.compare_and_swap(record, UNWRITTEN_VERSION) {
                Ok(_) => report.imported += 1,
                Err(EngineError::ConcurrentModification { .. }) => {
                    report.errors.push(RowError::new(
                        row.row,
                        format!(
                            "attendance for employee '{}' on {} is already recorded",
                            employee_id, date
                        ),
                    ));
                }
                Err(err @ EngineError::PeriodFinalized { .. }) => {
                    report.errors.push(RowError::new(row.row, err.to_string()));
                }
                Err(err) => return Err(err),
            }
        }

        report.errors.sort_by_key(|e| e.row);

        if report.errors.is_empty() {
            info!(imported = report.imported, "Attendance import completed");
        } else {
            warn!(
                imported = report.imported,
                rejected = report.errors.len(),
                "Attendance import completed with rejected rows"
            );
            for error in &report.errors {
                debug!(row = error.row, message = %error.message, "Rejected import row");
            }
        }
        Ok(report)
    }
}
