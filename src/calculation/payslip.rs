//! Payslip assembly.
//!
//! [`calculate_payslip`] runs the whole pipeline for one employee and pay
//! period: aggregation, proration, then assembly. Every step is pure, so
//! the same inputs always produce the same [`Payslip`] down to its
//! serialized JSON.

use crate::config::PayrollPolicy;
use crate::models::{
    AttendanceRecord, AuditStep, AuditTrace, DataQualityFlag, EmployeeIdentity, PayPeriod, Payslip,
    PayrollBase,
};

use super::aggregator::{AggregationResult, aggregate_period};
use super::proration::{ProrationInput, ProrationResult, calculate_proration};

/// Everything a payslip is computed from.
#[derive(Debug, Clone, Copy)]
pub struct PayslipInput<'a> {
    /// Who the payslip is for.
    pub employee: &'a EmployeeIdentity,
    /// Salary, deductions and bank details.
    pub payroll: &'a PayrollBase,
    /// The month being paid.
    pub pay_period: PayPeriod,
    /// The employee's attendance records; records outside the period are ignored.
    pub records: &'a [AttendanceRecord],
}

/// Computes a payslip from attendance and payroll data.
///
/// Flags [`DataQualityFlag::NoAttendanceRecords`] when the period has no
/// records, ahead of any flags raised by proration.
///
/// # Examples
///
/// ```
/// use attendance_payroll::calculation::{PayslipInput, calculate_payslip};
/// use attendance_payroll::config::PayrollPolicy;
/// use attendance_payroll::models::{
///     AttendanceRecord, AttendanceStatus, BankDetails, Deductions, EmployeeIdentity, PayPeriod,
///     PayrollBase,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = EmployeeIdentity {
///     employee_id: "emp_001".to_string(),
///     name: "Asha Rao".to_string(),
///     designation: None,
///     department: None,
///     branch_code: None,
/// };
/// let payroll = PayrollBase {
///     employee_id: "emp_001".to_string(),
///     basic_salary: Decimal::new(30000, 0),
///     deductions: Deductions::default(),
///     bank: BankDetails::default(),
/// };
/// let records: Vec<AttendanceRecord> = (1..=15)
///     .map(|d| {
///         let mut r = AttendanceRecord::new("emp_001", NaiveDate::from_ymd_opt(2026, 4, d).unwrap());
///         r.status = AttendanceStatus::Present;
///         r
///     })
///     .collect();
///
/// let payslip = calculate_payslip(
///     &PayslipInput {
///         employee: &employee,
///         payroll: &payroll,
///         pay_period: PayPeriod::new(4, 2026).unwrap(),
///         records: &records,
///     },
///     &PayrollPolicy::default(),
/// );
/// assert_eq!(payslip.prorated_gross_salary, Decimal::new(15000, 0));
/// assert!(payslip.is_clean());
/// ```
pub fn calculate_payslip(input: &PayslipInput<'_>, policy: &PayrollPolicy) -> Payslip {
    let aggregation = aggregate_period(
        &input.employee.employee_id,
        input.records,
        input.pay_period,
        1,
    );

    let total_days = input.pay_period.total_days_in_month();
    let proration = calculate_proration(
        &ProrationInput {
            basic_salary: input.payroll.basic_salary,
            deductions: input.payroll.deductions,
            present_days: aggregation.summary.present_days,
            total_days_in_month: (total_days > 0).then_some(total_days),
        },
        policy,
        2,
    );

    assemble_payslip(
        input.employee,
        input.pay_period,
        &aggregation,
        input.payroll,
        &proration,
    )
}

/// Composes a payslip from already-computed parts.
///
/// Pure: no clock, no I/O, no generated ids.
pub fn assemble_payslip(
    employee: &EmployeeIdentity,
    pay_period: PayPeriod,
    aggregation: &AggregationResult,
    payroll: &PayrollBase,
    proration: &ProrationResult,
) -> Payslip {
    let mut data_quality = Vec::new();
    if aggregation.summary.total_days == 0 {
        data_quality.push(DataQualityFlag::NoAttendanceRecords);
    }
    data_quality.extend(proration.data_quality.iter().copied());

    let mut trace = AuditTrace::default();
    trace.push(renumbered(&aggregation.audit_step, trace.next_step_number()));
    trace.push(renumbered(&proration.audit_step, trace.next_step_number()));

    let assembly_step = AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "payslip_assembly".to_string(),
        rule_name: "Payslip Assembly".to_string(),
        input: serde_json::json!({
            "employee_id": employee.employee_id,
            "month": pay_period.month,
            "year": pay_period.year
        }),
        output: serde_json::json!({
            "net_salary": proration.net_salary.to_string(),
            "data_quality": data_quality.iter().map(DataQualityFlag::code).collect::<Vec<_>>()
        }),
        reasoning: if data_quality.is_empty() {
            "Payslip assembled with no data-quality issues".to_string()
        } else {
            format!(
                "Payslip assembled with {} data-quality issue(s): {}",
                data_quality.len(),
                data_quality
                    .iter()
                    .map(DataQualityFlag::message)
                    .collect::<Vec<_>>()
                    .join("; ")
            )
        },
    };
    trace.push(assembly_step);

    Payslip {
        employee: employee.clone(),
        pay_period,
        total_days_in_month: pay_period.total_days_in_month(),
        attendance: aggregation.summary,
        basic_salary: payroll.basic_salary,
        prorated_gross_salary: proration.prorated_gross_salary,
        scaled_deductions: proration.scaled_deductions,
        total_deductions: proration.total_deductions,
        net_salary: proration.net_salary,
        bank: payroll.bank.clone(),
        data_quality,
        calculation_trace: trace,
    }
}

fn renumbered(step: &AuditStep, step_number: u32) -> AuditStep {
    AuditStep {
        step_number,
        ..step.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingPeriodFallback;
    use crate::models::{AttendanceStatus, BankDetails, Deductions};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn employee() -> EmployeeIdentity {
        EmployeeIdentity {
            employee_id: "emp_001".to_string(),
            name: "Asha Rao".to_string(),
            designation: Some("Engineer".to_string()),
            department: Some("Engineering".to_string()),
            branch_code: Some("BLR01".to_string()),
        }
    }

    fn payroll() -> PayrollBase {
        PayrollBase {
            employee_id: "emp_001".to_string(),
            basic_salary: dec("30000"),
            deductions: Deductions {
                provident_fund: dec("1200"),
                professional_tax: dec("200"),
                income_tax: dec("0"),
                other_deductions: dec("0"),
            },
            bank: BankDetails {
                bank_name: Some("State Bank".to_string()),
                account_number: Some("000111222333".to_string()),
                ifsc_code: Some("SBIN0000001".to_string()),
                pf_number: Some("KA/BLR/1".to_string()),
                uan: Some("100200300400".to_string()),
            },
        }
    }

    fn april_records(present: u32, absent: u32) -> Vec<AttendanceRecord> {
        (1..=present + absent)
            .map(|d| {
                let mut record =
                    AttendanceRecord::new("emp_001", NaiveDate::from_ymd_opt(2026, 4, d).unwrap());
                record.status = if d <= present {
                    AttendanceStatus::Present
                } else {
                    AttendanceStatus::Absent
                };
                record
            })
            .collect()
    }

    fn payslip_for(records: &[AttendanceRecord], period: PayPeriod, policy: &PayrollPolicy) -> Payslip {
        let employee = employee();
        let payroll = payroll();
        calculate_payslip(
            &PayslipInput {
                employee: &employee,
                payroll: &payroll,
                pay_period: period,
                records,
            },
            policy,
        )
    }

    /// PS-001: 20 present of 22 recorded in a 30-day month
    #[test]
    fn test_payslip_uses_calendar_month_not_record_count() {
        let records = april_records(20, 2);
        let payslip = payslip_for(&records, PayPeriod::new(4, 2026).unwrap(), &PayrollPolicy::default());

        assert_eq!(payslip.total_days_in_month, 30);
        assert_eq!(payslip.attendance.total_days, 22);
        assert_eq!(payslip.attendance.present_days, 20);
        assert_eq!(payslip.prorated_gross_salary, dec("20000"));
        assert_eq!(payslip.scaled_deductions.provident_fund, dec("800"));
        assert_eq!(payslip.net_salary, dec("19066.67"));
        assert!(payslip.is_clean());
    }

    /// PS-002: identical inputs give identical payslips and JSON
    #[test]
    fn test_payslip_is_deterministic() {
        let records = april_records(18, 3);
        let period = PayPeriod::new(4, 2026).unwrap();
        let first = payslip_for(&records, period, &PayrollPolicy::default());
        let second = payslip_for(&records, period, &PayrollPolicy::default());

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_bank_fields_pass_through() {
        let payslip = payslip_for(&april_records(1, 0), PayPeriod::new(4, 2026).unwrap(), &PayrollPolicy::default());
        assert_eq!(payslip.bank, payroll().bank);
        assert_eq!(payslip.employee, employee());
    }

    #[test]
    fn test_no_records_flags_and_zero_pay() {
        let payslip = payslip_for(&[], PayPeriod::new(4, 2026).unwrap(), &PayrollPolicy::default());
        assert_eq!(payslip.net_salary, Decimal::ZERO);
        assert_eq!(
            payslip.data_quality,
            vec![
                DataQualityFlag::NoAttendanceRecords,
                DataQualityFlag::NoPresentDays
            ]
        );
        assert!(payslip.calculation_trace.steps[2]
            .reasoning
            .contains("2 data-quality issue(s)"));
    }

    #[test]
    fn test_unknown_month_length_applies_fallback() {
        let records = april_records(5, 0);
        // Deserialized periods are not validated
        let period: PayPeriod = serde_json::from_str(r#"{"month": 13, "year": 2026}"#).unwrap();

        let full = payslip_for(&records, period, &PayrollPolicy::default());
        assert_eq!(full.total_days_in_month, 0);
        // Records from April do not fall in month 13
        assert!(full.data_quality.contains(&DataQualityFlag::NoAttendanceRecords));

        let zero_policy = PayrollPolicy {
            missing_period_fallback: MissingPeriodFallback::Zero,
            ..PayrollPolicy::default()
        };
        let zero = payslip_for(&records, period, &zero_policy);
        assert!(zero.data_quality.contains(&DataQualityFlag::PayPeriodUnavailable));
        assert_eq!(zero.net_salary, Decimal::ZERO);
    }

    #[test]
    fn test_trace_is_numbered_in_order() {
        let payslip = payslip_for(&april_records(10, 0), PayPeriod::new(4, 2026).unwrap(), &PayrollPolicy::default());
        let ids: Vec<&str> = payslip
            .calculation_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(ids, vec!["attendance_summary", "salary_proration", "payslip_assembly"]);
        let numbers: Vec<u32> = payslip
            .calculation_trace
            .steps
            .iter()
            .map(|s| s.step_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_records_outside_period_ignored() {
        let mut records = april_records(10, 0);
        let mut may = AttendanceRecord::new("emp_001", NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
        may.status = AttendanceStatus::Present;
        records.push(may);

        let payslip = payslip_for(&records, PayPeriod::new(4, 2026).unwrap(), &PayrollPolicy::default());
        assert_eq!(payslip.attendance.present_days, 10);
        assert_eq!(payslip.prorated_gross_salary, dec("10000"));
    }
}
