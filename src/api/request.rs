//! Request types for the attendance and payroll API.
//!
//! This module defines the JSON bodies and query strings the endpoints
//! accept.

use serde::{Deserialize, Serialize};

use crate::attendance::TransitionRequest;
use crate::error::EngineResult;
use crate::models::PayPeriod;

/// Body for `POST /attendance/check-in|start-break|end-break|check-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionBody {
    /// The employee the transition applies to.
    pub employee_id: String,
    /// Kind of work; required for check-in.
    #[serde(default)]
    pub work_type: Option<String>,
    /// Location; required for check-in.
    #[serde(default)]
    pub location: Option<String>,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Wall-clock time of the event, e.g. `"09:30 AM"`.
    pub manual_time: String,
}

impl From<TransitionBody> for TransitionRequest {
    fn from(body: TransitionBody) -> Self {
        TransitionRequest {
            work_type: body.work_type,
            location: body.location,
            remarks: body.remarks,
            manual_time: body.manual_time,
        }
    }
}

/// Query string `?employee_id=..&month=..&year=..`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeePeriodQuery {
    /// The employee to report on.
    pub employee_id: String,
    /// Month, 1-12.
    pub month: u32,
    /// Year.
    pub year: i32,
}

impl EmployeePeriodQuery {
    /// Validates the month and year into a pay period.
    pub fn period(&self) -> EngineResult<PayPeriod> {
        PayPeriod::new(self.month, self.year)
    }
}

/// Query string `?month=..&year=..`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodQuery {
    /// Month, 1-12.
    pub month: u32,
    /// Year.
    pub year: i32,
}

impl PeriodQuery {
    /// Validates the month and year into a pay period.
    pub fn period(&self) -> EngineResult<PayPeriod> {
        PayPeriod::new(self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_transition_body_optional_fields_default() {
        let body: TransitionBody =
            serde_json::from_str(r#"{"employee_id": "emp_001", "manual_time": "06:00 PM"}"#)
                .unwrap();
        let request: TransitionRequest = body.into();
        assert_eq!(request.manual_time, "06:00 PM");
        assert!(request.work_type.is_none());
        assert!(request.location.is_none());
    }

    #[test]
    fn test_transition_body_requires_manual_time() {
        let result: Result<TransitionBody, _> =
            serde_json::from_str(r#"{"employee_id": "emp_001"}"#);
        assert!(result.unwrap_err().to_string().contains("manual_time"));
    }

    #[test]
    fn test_period_query_validates_month() {
        let query = PeriodQuery { month: 0, year: 2026 };
        assert!(matches!(
            query.period(),
            Err(EngineError::InvalidPayPeriod { month: 0, year: 2026 })
        ));
        let query = EmployeePeriodQuery {
            employee_id: "emp_001".to_string(),
            month: 2,
            year: 2026,
        };
        assert_eq!(query.period().unwrap().total_days_in_month(), 28);
    }
}
