//! HTTP server for the attendance and payroll engine.
//!
//! Environment:
//!
//! - `ATTENDANCE_CONFIG_DIR`: directory holding `attendance.yaml` and
//!   `payroll.yaml` (default `./config/default`).
//! - `ATTENDANCE_EMPLOYEES_FILE`: employee directory YAML (default
//!   `employees.yaml` inside the config directory).
//! - `BIND_ADDR`: listen address (default `0.0.0.0:3000`).
//! - `RUST_LOG`: log filter (default `info`).

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attendance_payroll::api::{AppState, create_router};
use attendance_payroll::config::ConfigLoader;
use attendance_payroll::repository::{InMemoryAttendanceRepository, InMemoryPayrollRepository};

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir =
        PathBuf::from(env::var("ATTENDANCE_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string()));
    let employees_file = env::var("ATTENDANCE_EMPLOYEES_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config_dir.join("employees.yaml"));
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir)
        .with_context(|| format!("loading configuration from {}", config_dir.display()))?;
    info!(
        config_dir = %config_dir.display(),
        utc_offset = %config.attendance().utc_offset,
        "Configuration loaded"
    );

    let payroll = if employees_file.exists() {
        InMemoryPayrollRepository::load(&employees_file)
            .with_context(|| format!("loading employees from {}", employees_file.display()))?
    } else {
        warn!(
            path = %employees_file.display(),
            "Employee directory not found; starting with no employees"
        );
        InMemoryPayrollRepository::new()
    };

    let state = AppState::new(
        config,
        Arc::new(InMemoryAttendanceRepository::new()),
        Arc::new(payroll),
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    info!(addr = %bind_addr, "Attendance payroll server listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
