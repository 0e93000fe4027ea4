//! Salary proration.
//!
//! Scales a monthly basic salary and its fixed deductions by the share of
//! the pay-period month the employee was present:
//!
//! ```text
//! prorated_gross = basic_salary * present_days / total_days_in_month
//! scaled(d)      = d * prorated_gross / basic_salary
//! net_salary     = max(0, prorated_gross - sum(scaled(d)))
//! ```
//!
//! Multiplication always precedes division so exact cases stay exact.
//! Published figures are rounded to the configured currency scale, midpoint
//! away from zero, and the deduction total is the sum of the rounded
//! deductions so that a payslip always adds up.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{MissingPeriodFallback, PayrollPolicy};
use crate::models::{AuditStep, DataQualityFlag, Deductions, ScaledDeductions};

/// Inputs to a proration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProrationInput {
    /// Monthly basic salary at full attendance.
    pub basic_salary: Decimal,
    /// Fixed monthly deductions at full attendance.
    pub deductions: Deductions,
    /// Days counted as present in the period.
    pub present_days: u32,
    /// Calendar days in the pay-period month, if known.
    pub total_days_in_month: Option<u32>,
}

/// The result of a proration, including flags and the audit step.
#[derive(Debug, Clone)]
pub struct ProrationResult {
    /// Gross salary for the days present.
    pub prorated_gross_salary: Decimal,
    /// Each deduction scaled by the same ratio as gross.
    pub scaled_deductions: ScaledDeductions,
    /// Sum of the rounded scaled deductions.
    pub total_deductions: Decimal,
    /// Gross less deductions, floored at zero.
    pub net_salary: Decimal,
    /// Conditions that degraded the result.
    pub data_quality: Vec<DataQualityFlag>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prorates a salary by attendance.
///
/// Never fails. A non-positive basic salary or zero present days yields
/// zero pay with a [`DataQualityFlag`], as does a figure too large for
/// `Decimal` ([`DataQualityFlag::AmountOutOfRange`]). An unknown month
/// length applies the policy's [`MissingPeriodFallback`] and flags
/// [`DataQualityFlag::PayPeriodUnavailable`].
///
/// # Examples
///
/// ```
/// use attendance_payroll::calculation::{ProrationInput, calculate_proration};
/// use attendance_payroll::config::PayrollPolicy;
/// use attendance_payroll::models::Deductions;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let input = ProrationInput {
///     basic_salary: Decimal::from_str("30000").unwrap(),
///     deductions: Deductions {
///         provident_fund: Decimal::from_str("1200").unwrap(),
///         ..Deductions::default()
///     },
///     present_days: 20,
///     total_days_in_month: Some(30),
/// };
///
/// let result = calculate_proration(&input, &PayrollPolicy::default(), 1);
/// assert_eq!(result.prorated_gross_salary, Decimal::from_str("20000.00").unwrap());
/// assert_eq!(result.scaled_deductions.provident_fund, Decimal::from_str("800.00").unwrap());
/// assert_eq!(result.net_salary, Decimal::from_str("19200.00").unwrap());
/// ```
pub fn calculate_proration(
    input: &ProrationInput,
    policy: &PayrollPolicy,
    step_number: u32,
) -> ProrationResult {
    let scale = policy.currency_scale;
    let basic = input.basic_salary;
    let month_days = input.total_days_in_month.filter(|days| *days > 0);

    let mut data_quality = Vec::new();
    if basic <= Decimal::ZERO {
        data_quality.push(DataQualityFlag::BasicSalaryNotPositive);
    }
    if input.present_days == 0 {
        data_quality.push(DataQualityFlag::NoPresentDays);
    }
    if month_days.is_none() {
        data_quality.push(DataQualityFlag::PayPeriodUnavailable);
    }

    let (unrounded_gross, method) = if basic <= Decimal::ZERO {
        (Some(Decimal::ZERO), "basic salary not positive".to_string())
    } else if input.present_days == 0 {
        (Some(Decimal::ZERO), "no present days".to_string())
    } else {
        match month_days {
            Some(days) => (
                basic
                    .checked_mul(Decimal::from(input.present_days))
                    .and_then(|amount| amount.checked_div(Decimal::from(days))),
                format!(
                    "{} x {} / {}",
                    basic.normalize(),
                    input.present_days,
                    days
                ),
            ),
            None => match policy.missing_period_fallback {
                MissingPeriodFallback::FullSalary => {
                    (Some(basic), "month length unknown, full salary".to_string())
                }
                MissingPeriodFallback::Zero => {
                    (Some(Decimal::ZERO), "month length unknown, zero".to_string())
                }
            },
        }
    };

    let figures = unrounded_gross
        .and_then(|gross| prorate_figures(gross, basic, &input.deductions, scale))
        .unwrap_or_else(|| {
            data_quality.push(DataQualityFlag::AmountOutOfRange);
            ProratedFigures::zero(scale)
        });
    let ProratedFigures {
        gross,
        scaled_deductions,
        total_deductions,
        net_salary,
    } = figures;

    let audit_step = AuditStep {
        step_number,
        rule_id: "salary_proration".to_string(),
        rule_name: "Salary Proration".to_string(),
        input: serde_json::json!({
            "basic_salary": basic.to_string(),
            "present_days": input.present_days,
            "total_days_in_month": input.total_days_in_month,
            "deductions": {
                "provident_fund": input.deductions.provident_fund.to_string(),
                "professional_tax": input.deductions.professional_tax.to_string(),
                "income_tax": input.deductions.income_tax.to_string(),
                "other_deductions": input.deductions.other_deductions.to_string()
            }
        }),
        output: serde_json::json!({
            "prorated_gross_salary": gross.to_string(),
            "scaled_deductions": {
                "provident_fund": scaled_deductions.provident_fund.to_string(),
                "professional_tax": scaled_deductions.professional_tax.to_string(),
                "income_tax": scaled_deductions.income_tax.to_string(),
                "other_deductions": scaled_deductions.other_deductions.to_string()
            },
            "total_deductions": total_deductions.to_string(),
            "net_salary": net_salary.to_string(),
            "data_quality": data_quality.iter().map(DataQualityFlag::code).collect::<Vec<_>>()
        }),
        reasoning: format!(
            "Gross: {} = {}; deductions scaled to {}; net {}",
            method, gross, total_deductions, net_salary
        ),
    };

    ProrationResult {
        prorated_gross_salary: gross,
        scaled_deductions,
        total_deductions,
        net_salary,
        data_quality,
        audit_step,
    }
}

/// Rounded gross, deductions and net of one proration.
struct ProratedFigures {
    gross: Decimal,
    scaled_deductions: ScaledDeductions,
    total_deductions: Decimal,
    net_salary: Decimal,
}

impl ProratedFigures {
    fn zero(scale: u32) -> Self {
        let zero = round_currency(Decimal::ZERO, scale);
        Self {
            gross: zero,
            scaled_deductions: ScaledDeductions {
                provident_fund: zero,
                professional_tax: zero,
                income_tax: zero,
                other_deductions: zero,
            },
            total_deductions: zero,
            net_salary: zero,
        }
    }
}

/// Rounds gross and scales each deduction by `gross / basic`.
///
/// Returns `None` when any intermediate leaves the `Decimal` range.
fn prorate_figures(
    unrounded_gross: Decimal,
    basic: Decimal,
    deductions: &Deductions,
    scale: u32,
) -> Option<ProratedFigures> {
    let zero = round_currency(Decimal::ZERO, scale);
    let gross = round_currency(unrounded_gross, scale);

    let scale_deduction = |amount: Decimal| -> Option<Decimal> {
        if basic <= Decimal::ZERO {
            return Some(zero);
        }
        let scaled = amount.checked_mul(gross)?.checked_div(basic)?;
        Some(round_currency(scaled, scale))
    };

    let scaled_deductions = ScaledDeductions {
        provident_fund: scale_deduction(deductions.provident_fund)?,
        professional_tax: scale_deduction(deductions.professional_tax)?,
        income_tax: scale_deduction(deductions.income_tax)?,
        other_deductions: scale_deduction(deductions.other_deductions)?,
    };
    let total_deductions = scaled_deductions
        .provident_fund
        .checked_add(scaled_deductions.professional_tax)?
        .checked_add(scaled_deductions.income_tax)?
        .checked_add(scaled_deductions.other_deductions)?;
    let net_salary = gross.checked_sub(total_deductions)?.max(zero);

    Some(ProratedFigures {
        gross,
        scaled_deductions,
        total_deductions,
        net_salary,
    })
}

/// Rounds to `scale` places, midpoint away from zero, keeping the scale.
fn round_currency(amount: Decimal, scale: u32) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}
