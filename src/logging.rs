//! File logging.
//!
//! The TUI owns the terminal, so log output goes to a daily-rolling file in
//! the data directory. The filter comes from `RAGCHAT_LOG` (default `info`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_FILTER_ENV: &str = "RAGCHAT_LOG";

/// Default directory for log files (`<data>/ragchat/logs`)
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(dirs::data_dir()
        .context("Could not find data directory")?
        .join("ragchat")
        .join("logs"))
}

/// Install the global subscriber writing to `log_dir`.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the background writer.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, "ragchat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(guard)
}
