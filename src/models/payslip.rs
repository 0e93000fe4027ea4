//! Payslip model.
//!
//! A [`Payslip`] is a pure projection of its inputs. It is regenerated on
//! every view and must never be treated as a system of record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AttendanceSummary, AuditTrace, BankDetails, DataQualityFlag, EmployeeIdentity, PayPeriod};

/// Deductions after scaling by the attendance ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledDeductions {
    /// Scaled provident fund.
    pub provident_fund: Decimal,
    /// Scaled professional tax.
    pub professional_tax: Decimal,
    /// Scaled income tax.
    pub income_tax: Decimal,
    /// Scaled other deductions.
    pub other_deductions: Decimal,
}

impl ScaledDeductions {
    /// Returns the sum of the four scaled deductions.
    pub fn total(&self) -> Decimal {
        self.provident_fund + self.professional_tax + self.income_tax + self.other_deductions
    }
}

/// A computed payslip for one employee and pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Who the payslip is for.
    pub employee: EmployeeIdentity,
    /// The month it covers.
    pub pay_period: PayPeriod,
    /// Calendar days in the pay-period month.
    pub total_days_in_month: u32,
    /// Attendance counts for the period.
    pub attendance: AttendanceSummary,
    /// Monthly basic salary before proration.
    pub basic_salary: Decimal,
    /// Basic salary scaled by days present.
    pub prorated_gross_salary: Decimal,
    /// Deductions scaled by the same ratio.
    pub scaled_deductions: ScaledDeductions,
    /// Sum of the scaled deductions.
    pub total_deductions: Decimal,
    /// Gross minus deductions, never negative.
    pub net_salary: Decimal,
    /// Bank and PF reference fields.
    pub bank: BankDetails,
    /// Conditions that zeroed or substituted a figure.
    pub data_quality: Vec<DataQualityFlag>,
    /// How each figure was derived.
    pub calculation_trace: AuditTrace,
}

impl Payslip {
    /// Returns true if no data-quality condition affected the figures.
    pub fn is_clean(&self) -> bool {
        self.data_quality.is_empty()
    }
}
