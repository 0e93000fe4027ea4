//! Employee identity and payroll base models.
//!
//! These are owned by HR/payroll administration and only read by the
//! engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Who an employee is, as printed on a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeIdentity {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// Full name.
    pub name: String,
    /// Job title.
    #[serde(default)]
    pub designation: Option<String>,
    /// Department name.
    #[serde(default)]
    pub department: Option<String>,
    /// Home branch.
    #[serde(default)]
    pub branch_code: Option<String>,
}

/// Fixed monthly deductions at full attendance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    /// Provident fund contribution.
    #[serde(default)]
    pub provident_fund: Decimal,
    /// Professional tax.
    #[serde(default)]
    pub professional_tax: Decimal,
    /// Income tax withheld.
    #[serde(default)]
    pub income_tax: Decimal,
    /// Any other deduction.
    #[serde(default)]
    pub other_deductions: Decimal,
}

impl Deductions {
    /// Returns the sum of all four deductions.
    ///
    /// ```
    /// use attendance_payroll::models::Deductions;
    /// use rust_decimal::Decimal;
    ///
    /// let deductions = Deductions {
    ///     provident_fund: Decimal::new(1200, 0),
    ///     professional_tax: Decimal::new(200, 0),
    ///     income_tax: Decimal::new(1500, 0),
    ///     other_deductions: Decimal::ZERO,
    /// };
    /// assert_eq!(deductions.total(), Decimal::new(2900, 0));
    /// ```
    pub fn total(&self) -> Decimal {
        self.provident_fund + self.professional_tax + self.income_tax + self.other_deductions
    }
}

/// Bank and provident-fund reference fields, passed through to payslips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    /// Name of the bank.
    #[serde(default)]
    pub bank_name: Option<String>,
    /// Account number salary is paid into.
    #[serde(default)]
    pub account_number: Option<String>,
    /// Branch routing code.
    #[serde(default)]
    pub ifsc_code: Option<String>,
    /// Provident fund account number.
    #[serde(default)]
    pub pf_number: Option<String>,
    /// Universal account number.
    #[serde(default)]
    pub uan: Option<String>,
}

/// An employee's salary assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBase {
    /// The employee this assignment belongs to.
    pub employee_id: String,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Fixed deductions at full attendance.
    #[serde(default)]
    pub deductions: Deductions,
    /// Bank and PF reference fields.
    #[serde(default)]
    pub bank: BankDetails,
}
