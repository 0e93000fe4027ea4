//! Performance benchmarks for the attendance and payroll engine.
//!
//! This suite times the pure calculation core and the HTTP path:
//! - Summarizing a month of attendance records
//! - Prorating a salary and its deductions
//! - Assembling a complete payslip with its trace
//! - Payslip requests through the router, single and batched
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use attendance_payroll::api::{AppState, create_router};
use attendance_payroll::calculation::{
    PayslipInput, ProrationInput, calculate_payslip, calculate_proration, summarize_attendance,
};
use attendance_payroll::config::{ConfigLoader, PayrollPolicy};
use attendance_payroll::models::{
    AttendanceRecord, AttendanceStatus, BankDetails, Deductions, EmployeeIdentity, PayPeriod,
    PayrollBase,
};
use attendance_payroll::repository::{
    AttendanceRepository, InMemoryAttendanceRepository, InMemoryPayrollRepository,
    UNWRITTEN_VERSION,
};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Creates `days` records from 1 January 2026, cycling through statuses.
fn create_month_of_records(employee_id: &str, days: u64) -> Vec<AttendanceRecord> {
    let first = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let statuses = [
        AttendanceStatus::Present,
        AttendanceStatus::Present,
        AttendanceStatus::Late,
        AttendanceStatus::Present,
        AttendanceStatus::HalfDay,
        AttendanceStatus::Weekend,
        AttendanceStatus::Absent,
    ];

    (0..days)
        .map(|offset| {
            let mut record =
                AttendanceRecord::new(employee_id, first.checked_add_days(Days::new(offset)).unwrap());
            record.status = statuses[offset as usize % statuses.len()];
            record
        })
        .collect()
}

fn create_employee(employee_id: &str) -> (EmployeeIdentity, PayrollBase) {
    let identity = EmployeeIdentity {
        employee_id: employee_id.to_string(),
        name: "Bench Employee".to_string(),
        designation: None,
        department: None,
        branch_code: None,
    };
    let payroll = PayrollBase {
        employee_id: employee_id.to_string(),
        basic_salary: dec("45000.00"),
        deductions: Deductions {
            provident_fund: dec("1800.00"),
            professional_tax: dec("200.00"),
            income_tax: dec("2500.00"),
            other_deductions: dec("150.00"),
        },
        bank: BankDetails::default(),
    };
    (identity, payroll)
}

/// Creates router state with `employees` employees, each with a month of
/// attendance.
fn create_test_state(employees: usize) -> AppState {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    let attendance = InMemoryAttendanceRepository::new();
    let payroll = InMemoryPayrollRepository::new();

    for i in 0..employees {
        let employee_id = format!("emp_bench_{:04}", i);
        let (identity, base) = create_employee(&employee_id);
        payroll.upsert_employee(identity);
        payroll.upsert_payroll_base(base);
        for record in create_month_of_records(&employee_id, 31) {
            attendance
                .compare_and_swap(record, UNWRITTEN_VERSION)
                .expect("Failed to seed attendance");
        }
    }

    AppState::new(config, Arc::new(attendance), Arc::new(payroll))
}

/// Benchmark: Summarizing attendance records.
fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize_attendance");
    for days in [31u64, 366] {
        let records = create_month_of_records("emp_bench_0000", days);
        group.throughput(Throughput::Elements(days));
        group.bench_with_input(BenchmarkId::from_parameter(days), &records, |b, records| {
            b.iter(|| black_box(summarize_attendance(records.iter())))
        });
    }
    group.finish();
}

/// Benchmark: Prorating one salary.
fn bench_proration(c: &mut Criterion) {
    let policy = PayrollPolicy::default();
    let (_, payroll) = create_employee("emp_bench_0000");
    let input = ProrationInput {
        basic_salary: payroll.basic_salary,
        deductions: payroll.deductions,
        present_days: 19,
        total_days_in_month: Some(31),
    };

    c.bench_function("calculate_proration", |b| {
        b.iter(|| black_box(calculate_proration(black_box(&input), &policy, 2)))
    });
}

/// Benchmark: Computing one payslip from a month of records.
fn bench_payslip(c: &mut Criterion) {
    let policy = PayrollPolicy::default();
    let (employee, payroll) = create_employee("emp_bench_0000");
    let records = create_month_of_records("emp_bench_0000", 31);
    let pay_period = PayPeriod::new(1, 2026).unwrap();

    c.bench_function("calculate_payslip", |b| {
        b.iter(|| {
            let input = PayslipInput {
                employee: &employee,
                payroll: &payroll,
                pay_period,
                records: &records,
            };
            black_box(calculate_payslip(&input, &policy))
        })
    });
}

/// Benchmark: One payslip request through the router.
fn bench_payslip_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state(1));

    c.bench_function("payslip_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/payrolls/emp_bench_0000/payslip?month=1&year=2026")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Batch payslips for 100 employees.
fn bench_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state(100));

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));
    group.bench_function("batch_100", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/payslips?month=1&year=2026")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_summarize,
    bench_proration,
    bench_payslip,
    bench_payslip_request,
    bench_batch_100,
);
criterion_main!(benches);
