//! The per-day attendance state machine.
//!
//! ```text
//! NOT_CHECKED_IN --check in--> CHECKED_IN --start break--> ON_BREAK
//!                              CHECKED_IN <--end break---- ON_BREAK
//!                              CHECKED_IN --check out---> CHECKED_OUT
//!                                ON_BREAK --check out---> CHECKED_OUT   (policy)
//! ```
//!
//! Transitions are pure: they take the current record and return the
//! updated one, leaving persistence to the caller.

use chrono::{DateTime, FixedOffset};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AttendancePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AttendanceState, AttendanceStatus, BreakEnd, BreakStart, BreakTime, CheckIn,
    CheckOut, Transition,
};

use super::time_parse::parse_manual_time;

/// Input for one attendance transition.
///
/// Which fields matter depends on the transition: check-in needs
/// `work_type` and `location`, start-break uses `location`, all four use
/// `remarks` and `manual_time`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// Kind of work, required for check-in.
    #[serde(default)]
    pub work_type: Option<String>,
    /// Location, required for check-in.
    #[serde(default)]
    pub location: Option<String>,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Wall-clock time of the event, e.g. `"09:30 AM"`.
    pub manual_time: String,
}

impl TransitionRequest {
    /// Creates a request carrying only a time.
    pub fn at(manual_time: impl Into<String>) -> Self {
        Self {
            manual_time: manual_time.into(),
            ..Self::default()
        }
    }
}

/// Validates and applies attendance transitions under a policy.
#[derive(Debug, Clone, Default)]
pub struct AttendanceStateMachine {
    policy: AttendancePolicy,
}

impl AttendanceStateMachine {
    /// Creates a state machine for the given policy.
    pub fn new(policy: AttendancePolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy in force.
    pub fn policy(&self) -> &AttendancePolicy {
        &self.policy
    }

    /// Applies `transition` to `record`, returning the updated record.
    pub fn apply(
        &self,
        record: &AttendanceRecord,
        transition: Transition,
        request: &TransitionRequest,
    ) -> EngineResult<AttendanceRecord> {
        match transition {
            Transition::CheckIn => self.check_in(record, request),
            Transition::StartBreak => self.start_break(record, request),
            Transition::EndBreak => self.end_break(record, request),
            Transition::CheckOut => self.check_out(record, request),
        }
    }

    /// Records the day's check-in.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidTransition`] unless the day is not checked in.
    /// - [`EngineError::MissingRequiredField`] if `work_type` or `location`
    ///   is missing or blank.
    /// - [`EngineError::InvalidTimeFormat`] if `manual_time` does not parse.
    pub fn check_in(
        &self,
        record: &AttendanceRecord,
        request: &TransitionRequest,
    ) -> EngineResult<AttendanceRecord> {
        let state = record.state();
        if state != AttendanceState::NotCheckedIn {
            return Err(refuse(
                Transition::CheckIn,
                state,
                "already checked in today; the original check-in is kept",
            ));
        }

        let work_type = required(&request.work_type, "work_type")?;
        let location = required(&request.location, "location")?;
        let time = self.event_time(record, Transition::CheckIn, &request.manual_time)?;

        let mut updated = record.clone();
        updated.check_in = Some(CheckIn {
            time,
            work_type: Some(work_type),
            location: Some(location),
            remarks: trimmed(&request.remarks),
        });
        updated.status = derive_worked_status(&self.policy, time, None);
        updated.working_hours.scheduled = self.policy.scheduled_hours;

        debug!(
            employee_id = %record.employee_id,
            date = %record.date,
            status = %updated.status,
            "Check-in applied"
        );
        Ok(updated)
    }

    /// Records the start of the day's break.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidTransition`] unless checked in with no break
    /// taken yet today.
    pub fn start_break(
        &self,
        record: &AttendanceRecord,
        request: &TransitionRequest,
    ) -> EngineResult<AttendanceRecord> {
        let state = record.state();
        match state {
            AttendanceState::CheckedIn if record.break_time.is_some() => {
                return Err(refuse(
                    Transition::StartBreak,
                    state,
                    "a break has already been taken today",
                ));
            }
            AttendanceState::CheckedIn => {}
            AttendanceState::OnBreak => {
                return Err(refuse(Transition::StartBreak, state, "a break is already in progress"));
            }
            AttendanceState::NotCheckedIn => {
                return Err(refuse(Transition::StartBreak, state, "check in first"));
            }
            AttendanceState::CheckedOut => {
                return Err(refuse(Transition::StartBreak, state, "the day is already closed"));
            }
        }

        let time = self.event_time(record, Transition::StartBreak, &request.manual_time)?;

        let mut updated = record.clone();
        updated.break_time = Some(BreakTime {
            start: BreakStart {
                time,
                location: trimmed(&request.location),
                remarks: trimmed(&request.remarks),
            },
            end: None,
        });
        Ok(updated)
    }

    /// Records the end of the open break.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidTransition`] unless a break is in progress.
    pub fn end_break(
        &self,
        record: &AttendanceRecord,
        request: &TransitionRequest,
    ) -> EngineResult<AttendanceRecord> {
        let state = record.state();
        if state != AttendanceState::OnBreak {
            return Err(refuse(Transition::EndBreak, state, "no break is in progress"));
        }

        let time = self.event_time(record, Transition::EndBreak, &request.manual_time)?;

        let mut updated = record.clone();
        if let Some(break_time) = updated.break_time.as_mut() {
            break_time.end = Some(BreakEnd {
                time,
                remarks: trimmed(&request.remarks),
            });
        }
        Ok(updated)
    }

    /// Records the day's check-out and computes actual hours.
    ///
    /// Checking out while on break is governed by
    /// [`AttendancePolicy::allow_checkout_during_break`]. When allowed, the
    /// break stays open on the record and is not deducted from actual hours.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidTransition`] unless checked in (or on break
    /// with the policy allowing it).
    pub fn check_out(
        &self,
        record: &AttendanceRecord,
        request: &TransitionRequest,
    ) -> EngineResult<AttendanceRecord> {
        let state = record.state();
        match state {
            AttendanceState::CheckedIn => {}
            AttendanceState::OnBreak if self.policy.allow_checkout_during_break => {}
            AttendanceState::OnBreak => {
                return Err(refuse(Transition::CheckOut, state, "end the break before checking out"));
            }
            AttendanceState::NotCheckedIn => {
                return Err(refuse(Transition::CheckOut, state, "check in first"));
            }
            AttendanceState::CheckedOut => {
                return Err(refuse(Transition::CheckOut, state, "already checked out today"));
            }
        }

        let time = self.event_time(record, Transition::CheckOut, &request.manual_time)?;

        let mut updated = record.clone();
        updated.check_out = Some(CheckOut {
            time,
            remarks: trimmed(&request.remarks),
        });
        updated.working_hours.actual = actual_hours(&updated, time);

        let worked_status = matches!(
            updated.status,
            AttendanceStatus::Present | AttendanceStatus::Late
        );
        if let (true, Some(check_in)) = (worked_status, updated.check_in.as_ref()) {
            updated.status =
                derive_worked_status(&self.policy, check_in.time, Some(updated.working_hours.actual));
        }

        debug!(
            employee_id = %record.employee_id,
            date = %record.date,
            actual_hours = %updated.working_hours.actual,
            break_left_open = state == AttendanceState::OnBreak,
            "Check-out applied"
        );
        Ok(updated)
    }

    /// Parses the manual time and checks it does not precede the day's
    /// latest event.
    fn event_time(
        &self,
        record: &AttendanceRecord,
        action: Transition,
        manual_time: &str,
    ) -> EngineResult<DateTime<FixedOffset>> {
        let time = parse_manual_time(manual_time, record.date, self.policy.utc_offset)?;

        match record.last_event_time() {
            Some(previous) if time < previous => Err(EngineError::OutOfOrderEvent {
                action,
                time,
                previous,
            }),
            _ => Ok(time),
        }
    }
}

/// Status of a day that was worked.
///
/// Half-day when `actual_hours` is known and below the policy threshold,
/// otherwise late when the check-in is strictly after `late_after`,
/// otherwise present. Shared by live transitions and bulk import.
pub(crate) fn derive_worked_status(
    policy: &AttendancePolicy,
    check_in: DateTime<FixedOffset>,
    actual_hours: Option<Decimal>,
) -> AttendanceStatus {
    let short_day = actual_hours
        .zip(policy.half_day_below_hours)
        .is_some_and(|(hours, threshold)| hours < threshold);
    let late = policy
        .late_after
        .is_some_and(|threshold| check_in.time() > threshold);

    if short_day {
        AttendanceStatus::HalfDay
    } else if late {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

/// Worked hours between check-in and `check_out`, less a closed break.
pub(crate) fn actual_hours(record: &AttendanceRecord, check_out: DateTime<FixedOffset>) -> Decimal {
    let Some(check_in) = record.check_in.as_ref() else {
        return Decimal::ZERO;
    };

    let total_minutes = (check_out - check_in.time).num_minutes();
    let break_minutes = record
        .break_time
        .as_ref()
        .and_then(|b| b.end.as_ref().map(|end| (end.time - b.start.time).num_minutes()))
        .unwrap_or(0);

    let worked_minutes = (total_minutes - break_minutes).max(0);
    (Decimal::from(worked_minutes) / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn refuse(action: Transition, state: AttendanceState, message: &str) -> EngineError {
    EngineError::InvalidTransition {
        action,
        state,
        message: message.to_string(),
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: &Option<String>, field: &str) -> EngineResult<String> {
    trimmed(value).ok_or_else(|| EngineError::MissingRequiredField {
        field: field.to_string(),
    })
}
