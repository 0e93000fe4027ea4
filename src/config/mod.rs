//! Configuration loading and management for the engine.
//!
//! This module loads attendance and payroll policy from YAML files: the
//! time zone wall-clock times are anchored in, whether checking out during a
//! break is allowed, late and half-day thresholds, the currency scale, and
//! what proration does when a pay period's length is unknown.
//!
//! # Example
//!
//! ```no_run
//! use attendance_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Currency scale: {}", config.payroll().currency_scale);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AttendancePolicy, EngineConfig, MissingPeriodFallback, PayrollPolicy};
