//! Payroll orchestration: fetch, aggregate, prorate, assemble.

use std::sync::Arc;

use tracing::{info, warn};

use crate::calculation::{PayslipInput, calculate_payslip};
use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, Payslip, PayrollBase};
use crate::repository::{AttendanceRepository, PayrollRepository};

/// Generates payslips from stored attendance and payroll data.
///
/// Payslips are recomputed on every call and never stored.
#[derive(Clone)]
pub struct PayrollService {
    attendance: Arc<dyn AttendanceRepository>,
    payroll: Arc<dyn PayrollRepository>,
    policy: PayrollPolicy,
}

impl PayrollService {
    /// Creates a service over the given repositories.
    pub fn new(
        attendance: Arc<dyn AttendanceRepository>,
        payroll: Arc<dyn PayrollRepository>,
        policy: PayrollPolicy,
    ) -> Self {
        Self {
            attendance,
            payroll,
            policy,
        }
    }

    /// Returns an employee's payroll base.
    ///
    /// # Errors
    ///
    /// [`EngineError::PayrollNotFound`] if none is configured.
    pub fn payroll_base(&self, employee_id: &str) -> EngineResult<PayrollBase> {
        self.payroll
            .payroll_base(employee_id)?
            .ok_or_else(|| EngineError::PayrollNotFound {
                employee_id: employee_id.to_string(),
            })
    }

    /// Generates one employee's payslip for a pay period.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmployeeNotFound`] or [`EngineError::PayrollNotFound`]
    /// when the employee's identity or payroll base is missing.
    pub fn generate_payslip(&self, employee_id: &str, period: PayPeriod) -> EngineResult<Payslip> {
        let employee = self
            .payroll
            .employee(employee_id)?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })?;
        let payroll = self.payroll_base(employee_id)?;
        let records = self.attendance.records_for_period(employee_id, period)?;

        let payslip = calculate_payslip(
            &PayslipInput {
                employee: &employee,
                payroll: &payroll,
                pay_period: period,
                records: &records,
            },
            &self.policy,
        );

        if payslip.is_clean() {
            info!(
                employee_id = %employee_id,
                month = period.month,
                year = period.year,
                net_salary = %payslip.net_salary,
                "Payslip generated"
            );
        } else {
            warn!(
                employee_id = %employee_id,
                month = period.month,
                year = period.year,
                net_salary = %payslip.net_salary,
                flags = ?payslip.data_quality,
                "Payslip generated with data-quality issues"
            );
        }
        Ok(payslip)
    }

    /// Generates payslips for several employees.
    ///
    /// One employee's failure does not stop the others; results are returned
    /// in input order.
    pub fn generate_payslips(
        &self,
        employee_ids: &[String],
        period: PayPeriod,
    ) -> Vec<(String, EngineResult<Payslip>)> {
        employee_ids
            .iter()
            .map(|id| (id.clone(), self.generate_payslip(id, period)))
            .collect()
    }

    /// Generates payslips for every known employee.
    pub fn generate_all_payslips(
        &self,
        period: PayPeriod,
    ) -> EngineResult<Vec<(String, EngineResult<Payslip>)>> {
        let ids = self.payroll.employee_ids()?;
        Ok(self.generate_payslips(&ids, period))
    }

    /// Freezes an employee's attendance for a pay period.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmployeeNotFound`] when the employee is not in the
    /// directory; nothing is frozen in that case.
    pub fn finalize_period(&self, employee_id: &str, period: PayPeriod) -> EngineResult<()> {
        if self.payroll.employee(employee_id)?.is_none() {
            return Err(EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            });
        }
        self.attendance.finalize(employee_id, period)?;
        info!(
            employee_id = %employee_id,
            month = period.month,
            year = period.year,
            "Pay period finalized"
        );
        Ok(())
    }
}
