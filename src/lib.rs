//! Attendance-to-payroll reconciliation engine.
//!
//! This crate records per-employee, per-day attendance through a strict
//! check-in / break / check-out state machine, aggregates the recorded days
//! into attendance summaries, and prorates monthly salaries and deductions
//! into payslips. The calculation core is pure and synchronous; the
//! [`service`] layer binds it to the [`repository`] traits and the [`api`]
//! module serves it over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
