use crate::persistence::ensure_dir;
use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. "debug", "taskpad=trace")
pub const LOG_ENV: &str = "TASKPAD_LOG";

/// Build the log filter from TASKPAD_LOG, defaulting to info
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize file logging in `log_dir`.
///
/// Logs go to a daily rolling file. The returned guard must live until exit
/// or buffered lines are lost.
pub fn init_logging(log_dir: &Path) -> Result<WorkerGuard> {
    ensure_dir(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "taskpad.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("Failed to set global tracing subscriber")?;

    tracing::info!("Logging initialized at {:?}", log_dir);
    Ok(guard)
}
