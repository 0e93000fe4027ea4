//! In-memory repository implementations.
//!
//! Both stores keep their maps behind a [`Mutex`]. The attendance store holds
//! the lock only for the duration of a single read or compare-and-swap, which
//! is what serializes competing writers to the same key.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, BankDetails, Deductions, EmployeeIdentity, PayPeriod, PayrollBase,
};

use super::{AttendanceRepository, PayrollRepository, UNWRITTEN_VERSION, VersionedRecord};

type RecordKey = (String, NaiveDate);

#[derive(Debug, Default)]
struct AttendanceStore {
    records: HashMap<RecordKey, VersionedRecord>,
    finalized: HashSet<(String, PayPeriod)>,
}

impl AttendanceStore {
    fn is_finalized(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.finalized
            .contains(&(employee_id.to_string(), PayPeriod::containing(date)))
    }
}

/// Attendance records held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAttendanceRepository {
    store: Mutex<AttendanceStore>,
}

impl InMemoryAttendanceRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AttendanceStore> {
        // Every mutation is a single insert, so a poisoned map is still whole.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AttendanceRepository for InMemoryAttendanceRepository {
    fn get(&self, employee_id: &str, date: NaiveDate) -> EngineResult<Option<VersionedRecord>> {
        Ok(self
            .lock()
            .records
            .get(&(employee_id.to_string(), date))
            .cloned())
    }

    fn compare_and_swap(&self, record: AttendanceRecord, expected_version: u64) -> EngineResult<u64> {
        let mut store = self.lock();

        if store.is_finalized(&record.employee_id, record.date) {
            return Err(EngineError::PeriodFinalized {
                employee_id: record.employee_id,
                date: record.date,
            });
        }

        let key = (record.employee_id.clone(), record.date);
        let current = store
            .records
            .get(&key)
            .map(|stored| stored.version)
            .unwrap_or(UNWRITTEN_VERSION);

        if current != expected_version {
            debug!(
                employee_id = %record.employee_id,
                date = %record.date,
                expected_version,
                current_version = current,
                "Rejected stale attendance write"
            );
            return Err(EngineError::ConcurrentModification {
                employee_id: record.employee_id,
                date: record.date,
            });
        }

        let version = current + 1;
        store.records.insert(key, VersionedRecord { record, version });
        Ok(version)
    }

    fn records_for_employee(&self, employee_id: &str) -> EngineResult<Vec<AttendanceRecord>> {
        let mut records: Vec<AttendanceRecord> = self
            .lock()
            .records
            .iter()
            .filter(|((id, _), _)| id == employee_id)
            .map(|(_, stored)| stored.record.clone())
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    fn is_finalized(&self, employee_id: &str, date: NaiveDate) -> EngineResult<bool> {
        Ok(self.lock().is_finalized(employee_id, date))
    }

    fn finalize(&self, employee_id: &str, period: PayPeriod) -> EngineResult<()> {
        self.lock()
            .finalized
            .insert((employee_id.to_string(), period));
        Ok(())
    }
}

/// One entry of an employee directory file.
#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    employee_id: String,
    name: String,
    #[serde(default)]
    designation: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    branch_code: Option<String>,
    #[serde(default)]
    basic_salary: Option<Decimal>,
    #[serde(default)]
    deductions: Deductions,
    #[serde(default)]
    bank: BankDetails,
}

#[derive(Debug, Default)]
struct PayrollStore {
    employees: BTreeMap<String, EmployeeIdentity>,
    payroll: HashMap<String, PayrollBase>,
}

/// Employee identities and payroll bases held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryPayrollRepository {
    store: Mutex<PayrollStore>,
}

impl InMemoryPayrollRepository {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an employee directory from a YAML list.
    ///
    /// Each entry carries the identity fields and, optionally, a
    /// `basic_salary` with `deductions` and `bank`. Entries without a
    /// salary are known employees with no payroll configured.
    ///
    /// ```text
    /// - employee_id: emp_001
    ///   name: Asha Rao
    ///   basic_salary: "30000.00"
    ///   deductions:
    ///     provident_fund: "1200"
    /// ```
    ///
    /// # Errors
    ///
    /// [`EngineError::ConfigNotFound`] if the file cannot be read and
    /// [`EngineError::ConfigParseError`] if it is not a valid directory.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;
        let entries: Vec<DirectoryEntry> =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        let repository = Self::new();
        for entry in entries {
            if let Some(basic_salary) = entry.basic_salary {
                repository.upsert_payroll_base(PayrollBase {
                    employee_id: entry.employee_id.clone(),
                    basic_salary,
                    deductions: entry.deductions,
                    bank: entry.bank,
                });
            }
            repository.upsert_employee(EmployeeIdentity {
                employee_id: entry.employee_id,
                name: entry.name,
                designation: entry.designation,
                department: entry.department,
                branch_code: entry.branch_code,
            });
        }

        debug!(
            path = %path_str,
            employees = repository.lock().employees.len(),
            "Loaded employee directory"
        );
        Ok(repository)
    }

    /// Inserts or replaces an employee identity.
    pub fn upsert_employee(&self, identity: EmployeeIdentity) {
        self.lock()
            .employees
            .insert(identity.employee_id.clone(), identity);
    }

    /// Inserts or replaces an employee's payroll base.
    pub fn upsert_payroll_base(&self, base: PayrollBase) {
        self.lock().payroll.insert(base.employee_id.clone(), base);
    }

    fn lock(&self) -> MutexGuard<'_, PayrollStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PayrollRepository for InMemoryPayrollRepository {
    fn employee(&self, employee_id: &str) -> EngineResult<Option<EmployeeIdentity>> {
        Ok(self.lock().employees.get(employee_id).cloned())
    }

    fn payroll_base(&self, employee_id: &str) -> EngineResult<Option<PayrollBase>> {
        Ok(self.lock().payroll.get(employee_id).cloned())
    }

    fn employee_ids(&self) -> EngineResult<Vec<String>> {
        Ok(self.lock().employees.keys().cloned().collect())
    }
}
