//! Storage interfaces for attendance and payroll data.
//!
//! Services depend on these traits rather than on a concrete store, so the
//! engine can run over the in-memory implementations in [`memory`] or over
//! any other backend that honours the same contracts.
//!
//! Writes to an attendance record go through
//! [`AttendanceRepository::compare_and_swap`]: every stored record carries a
//! version, and a write only lands if the caller saw the current one. That
//! gives at most one successful writer per (employee, date) key.

pub mod memory;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::{AttendanceRecord, EmployeeIdentity, PayPeriod, PayrollBase};

pub use memory::{InMemoryAttendanceRepository, InMemoryPayrollRepository};

/// Version of a key that has never been written.
pub const UNWRITTEN_VERSION: u64 = 0;

/// A stored record together with its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedRecord {
    /// The stored record.
    pub record: AttendanceRecord,
    /// Incremented on every successful write; never [`UNWRITTEN_VERSION`].
    pub version: u64,
}

/// The attendance event store: one record per employee per calendar day.
pub trait AttendanceRepository: Send + Sync {
    /// Returns the record for a key, if one has been written.
    fn get(&self, employee_id: &str, date: NaiveDate) -> EngineResult<Option<VersionedRecord>>;

    /// Writes `record` if the stored version still equals `expected_version`.
    ///
    /// Pass [`UNWRITTEN_VERSION`] to create a record. Returns the new version.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConcurrentModification`](crate::error::EngineError::ConcurrentModification)
    ///   if the stored version differs.
    /// - [`EngineError::PeriodFinalized`](crate::error::EngineError::PeriodFinalized)
    ///   if the day belongs to a finalized pay period.
    fn compare_and_swap(&self, record: AttendanceRecord, expected_version: u64) -> EngineResult<u64>;

    /// Returns all of an employee's records, ordered by date.
    fn records_for_employee(&self, employee_id: &str) -> EngineResult<Vec<AttendanceRecord>>;

    /// Returns an employee's records within a pay period, ordered by date.
    fn records_for_period(
        &self,
        employee_id: &str,
        period: PayPeriod,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self
            .records_for_employee(employee_id)?
            .into_iter()
            .filter(|r| period.contains_date(r.date))
            .collect())
    }

    /// Returns true if the day belongs to a finalized pay period.
    fn is_finalized(&self, employee_id: &str, date: NaiveDate) -> EngineResult<bool>;

    /// Marks an employee's pay period as finalized, freezing its records.
    fn finalize(&self, employee_id: &str, period: PayPeriod) -> EngineResult<()>;
}

/// Read access to HR-owned employee and payroll data.
pub trait PayrollRepository: Send + Sync {
    /// Returns an employee's identity, if known.
    fn employee(&self, employee_id: &str) -> EngineResult<Option<EmployeeIdentity>>;

    /// Returns an employee's payroll base, if configured.
    fn payroll_base(&self, employee_id: &str) -> EngineResult<Option<PayrollBase>>;

    /// Returns the ids of all known employees, sorted.
    fn employee_ids(&self) -> EngineResult<Vec<String>>;
}
