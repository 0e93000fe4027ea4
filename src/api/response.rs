//! Response types for the attendance and payroll API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API, plus the bodies of the batch and finalize endpoints.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Payslip;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a missing field error response.
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::with_details(
            "MISSING_FIELD",
            format!("missing field: {}", field),
            format!("Required field '{}' was not provided in the request", field),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::InvalidTransition { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("INVALID_TRANSITION", message),
            ),
            EngineError::InvalidTimeFormat { input } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_TIME_FORMAT",
                    message,
                    format!(
                        "'{}' is not a time of day; use e.g. \"09:30 AM\" or \"14:05\"",
                        input
                    ),
                ),
            ),
            EngineError::MissingRequiredField { field } => {
                (StatusCode::BAD_REQUEST, ApiError::missing_field(field))
            }
            EngineError::OutOfOrderEvent { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("OUT_OF_ORDER_EVENT", message),
            ),
            EngineError::ConcurrentModification { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "CONCURRENT_MODIFICATION",
                    message,
                    "Another request updated this record first; reload and retry",
                ),
            ),
            EngineError::PeriodFinalized { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("PERIOD_FINALIZED", message),
            ),
            EngineError::InvalidPayPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PAY_PERIOD", message),
            ),
            EngineError::EmployeeNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("EMPLOYEE_NOT_FOUND", message),
            ),
            EngineError::PayrollNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("PAYROLL_NOT_FOUND", message),
            ),
            EngineError::ImportError { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("IMPORT_ERROR", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

/// One employee's entry in a batch payslip run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipOutcome {
    /// The employee the entry is for.
    pub employee_id: String,
    /// The payslip, when generation succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payslip: Option<Payslip>,
    /// Why generation failed, otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl PayslipOutcome {
    /// Converts a service result into a batch entry.
    pub fn from_result(employee_id: String, result: EngineResult<Payslip>) -> Self {
        match result {
            Ok(payslip) => Self {
                employee_id,
                payslip: Some(payslip),
                error: None,
            },
            Err(err) => Self {
                employee_id,
                payslip: None,
                error: Some(ApiErrorResponse::from(err).error),
            },
        }
    }
}

/// Body returned after finalizing a pay period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeResponse {
    /// The employee whose period was finalized.
    pub employee_id: String,
    /// Month finalized.
    pub month: u32,
    /// Year finalized.
    pub year: i32,
    /// Always true on success.
    pub finalized: bool,
}
