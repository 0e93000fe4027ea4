//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{AttendancePolicy, EngineConfig, PayrollPolicy};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── attendance.yaml   # Time zone, break policy, late/half-day thresholds
/// └── payroll.yaml      # Currency scale, missing-period fallback
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Checkout during break allowed: {}", loader.attendance().allow_checkout_during_break);
/// # Ok::<(), attendance_payroll::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigNotFound`] if either file is missing and
    /// [`EngineError::ConfigParseError`] if either contains invalid YAML or
    /// invalid values.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let attendance = Self::load_yaml::<AttendancePolicy>(&path.join("attendance.yaml"))?;
        let payroll = Self::load_yaml::<PayrollPolicy>(&path.join("payroll.yaml"))?;

        debug!(
            config_dir = %path.display(),
            utc_offset = %attendance.utc_offset,
            allow_checkout_during_break = attendance.allow_checkout_during_break,
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(attendance, payroll),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the attendance policy.
    pub fn attendance(&self) -> &AttendancePolicy {
        self.config.attendance()
    }

    /// Returns the payroll policy.
    pub fn payroll(&self) -> &PayrollPolicy {
        self.config.payroll()
    }
}
