//! HTTP request handlers for the attendance and payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::Transition;

use super::request::{EmployeePeriodQuery, PeriodQuery, TransitionBody};
use super::response::{ApiError, ApiErrorResponse, FinalizeResponse, PayslipOutcome};
use super::state::AppState;

type JsonBody = Result<Json<TransitionBody>, JsonRejection>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance", get(list_attendance_handler))
        .route("/attendance/summary", get(attendance_summary_handler))
        .route("/attendance/check-in", post(check_in_handler))
        .route("/attendance/start-break", post(start_break_handler))
        .route("/attendance/end-break", post(end_break_handler))
        .route("/attendance/check-out", post(check_out_handler))
        .route("/attendance/import", post(import_handler))
        .route("/payrolls/:employee_id", get(payroll_base_handler))
        .route("/payrolls/:employee_id/payslip", get(payslip_handler))
        .route("/payrolls/:employee_id/finalize", post(finalize_handler))
        .route("/payslips", get(batch_payslips_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's message, including the field name
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("MISSING_FIELD", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn query_rejection_response(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Query string error"
    );
    json_response(
        StatusCode::BAD_REQUEST,
        ApiError::validation_error(body_text),
    )
}

/// Applies one transition to the caller's record for today.
fn apply_transition(state: &AppState, transition: Transition, payload: JsonBody) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        transition = %transition,
        "Processing attendance transition"
    );

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let employee_id = body.employee_id.clone();
    let date = state.today();
    match state
        .attendance()
        .transition(&employee_id, date, transition, &body.into())
    {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                date = %date,
                status = %record.status,
                "Attendance transition applied"
            );
            json_response(StatusCode::OK, record)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /attendance/check-in.
async fn check_in_handler(State(state): State<AppState>, payload: JsonBody) -> Response {
    apply_transition(&state, Transition::CheckIn, payload)
}

/// Handler for POST /attendance/start-break.
async fn start_break_handler(State(state): State<AppState>, payload: JsonBody) -> Response {
    apply_transition(&state, Transition::StartBreak, payload)
}

/// Handler for POST /attendance/end-break.
async fn end_break_handler(State(state): State<AppState>, payload: JsonBody) -> Response {
    apply_transition(&state, Transition::EndBreak, payload)
}

/// Handler for POST /attendance/check-out.
async fn check_out_handler(State(state): State<AppState>, payload: JsonBody) -> Response {
    apply_transition(&state, Transition::CheckOut, payload)
}

/// Handler for GET /attendance.
///
/// Lists an employee's records for a month, ordered by date.
async fn list_attendance_handler(
    State(state): State<AppState>,
    query: Result<Query<EmployeePeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    let result = query
        .period()
        .and_then(|period| state.attendance().records_for_period(&query.employee_id, period));

    match result {
        Ok(records) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %query.employee_id,
                records = records.len(),
                "Listed attendance"
            );
            json_response(StatusCode::OK, records)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /attendance/summary.
async fn attendance_summary_handler(
    State(state): State<AppState>,
    query: Result<Query<EmployeePeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    match query
        .period()
        .and_then(|period| state.attendance().report(&query.employee_id, period))
    {
        Ok(report) => json_response(StatusCode::OK, report),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /attendance/import.
///
/// Accepts a CSV body and returns the import report. Per-row problems are
/// part of a 200 response; only an unreadable header fails the request.
async fn import_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        bytes = body.len(),
        "Processing attendance import"
    );

    match state.attendance().import_csv(body.as_ref()) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                imported = report.imported,
                rejected = report.errors.len(),
                "Attendance import finished"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /payrolls/:employee_id.
async fn payroll_base_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.payroll().payroll_base(&employee_id) {
        Ok(base) => json_response(StatusCode::OK, base),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /payrolls/:employee_id/payslip.
///
/// Recomputes the payslip on every call.
async fn payslip_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        "Processing payslip request"
    );
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match query
        .period()
        .and_then(|period| state.payroll().generate_payslip(&employee_id, period))
    {
        Ok(payslip) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                net_salary = %payslip.net_salary,
                duration_us = start_time.elapsed().as_micros(),
                "Payslip computed"
            );
            json_response(StatusCode::OK, payslip)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /payrolls/:employee_id/finalize.
async fn finalize_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    match query
        .period()
        .and_then(|period| state.payroll().finalize_period(&employee_id, period))
    {
        Ok(()) => json_response(
            StatusCode::OK,
            FinalizeResponse {
                employee_id,
                month: query.month,
                year: query.year,
                finalized: true,
            },
        ),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /payslips.
///
/// Runs payslips for every known employee. Failures are reported per
/// employee inside a 200 response.
async fn batch_payslips_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match query
        .period()
        .and_then(|period| state.payroll().generate_all_payslips(period))
    {
        Ok(results) => {
            let outcomes: Vec<PayslipOutcome> = results
                .into_iter()
                .map(|(employee_id, result)| PayslipOutcome::from_result(employee_id, result))
                .collect();
            info!(
                correlation_id = %correlation_id,
                employees = outcomes.len(),
                failed = outcomes.iter().filter(|o| o.error.is_some()).count(),
                duration_us = start_time.elapsed().as_micros(),
                "Batch payslips computed"
            );
            json_response(StatusCode::OK, outcomes)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::FixedClock;
    use crate::config::ConfigLoader;
    use crate::models::{AttendanceRecord, AttendanceState, AttendanceStatus};
    use crate::repository::{InMemoryAttendanceRepository, InMemoryPayrollRepository};
    use axum::{body::Body, http::Request};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/default").expect("Failed to load config");
        let payroll = InMemoryPayrollRepository::load("./config/default/employees.yaml")
            .expect("Failed to load employees");
        AppState::new(
            config,
            Arc::new(InMemoryAttendanceRepository::new()),
            Arc::new(payroll),
        )
        .with_clock(Arc::new(FixedClock(today())))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    const CHECK_IN: &str = r#"{
        "employee_id": "emp_001",
        "work_type": "office",
        "location": "HQ",
        "manual_time": "09:00 AM"
    }"#;

    #[tokio::test]
    async fn test_api_001_check_in_returns_record() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/attendance/check-in", CHECK_IN))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let record: AttendanceRecord = read_json(response).await;
        assert_eq!(record.employee_id, "emp_001");
        assert_eq!(record.date, today());
        assert_eq!(record.state(), AttendanceState::CheckedIn);
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn test_api_002_double_check_in_returns_409() {
        let router = create_router(create_test_state());

        let first = router
            .clone()
            .oneshot(post_json("/attendance/check-in", CHECK_IN))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = router
            .oneshot(post_json("/attendance/check-in", CHECK_IN))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let error: ApiError = read_json(second).await;
        assert_eq!(error.code, "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_api_003_bad_time_returns_400() {
        let router = create_router(create_test_state());
        let body = r#"{"employee_id": "emp_001", "work_type": "office", "location": "HQ", "manual_time": "half nine"}"#;

        let response = router
            .oneshot(post_json("/attendance/check-in", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "INVALID_TIME_FORMAT");
    }

    #[tokio::test]
    async fn test_api_004_missing_location_returns_400() {
        let router = create_router(create_test_state());
        let body = r#"{"employee_id": "emp_001", "work_type": "office", "manual_time": "09:00"}"#;

        let response = router
            .oneshot(post_json("/attendance/check-in", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "MISSING_FIELD");
        assert!(error.message.contains("location"));
    }

    #[tokio::test]
    async fn test_api_005_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/attendance/check-out", "{invalid json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_api_006_payroll_base_lookup() {
        let router = create_router(create_test_state());

        let found = router
            .clone()
            .oneshot(get("/payrolls/emp_001"))
            .await
            .unwrap();
        assert_eq!(found.status(), StatusCode::OK);
        let base: serde_json::Value = read_json(found).await;
        assert_eq!(base["basic_salary"], "30000.00");

        let missing = router.oneshot(get("/payrolls/emp_003")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        let error: ApiError = read_json(missing).await;
        assert_eq!(error.code, "PAYROLL_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_api_007_invalid_month_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(get("/attendance?employee_id=emp_001&month=13&year=2026"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "INVALID_PAY_PERIOD");
    }

    #[tokio::test]
    async fn test_api_008_missing_query_returns_400() {
        let router = create_router(create_test_state());

        let response = router.oneshot(get("/attendance/summary?month=1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }
}
