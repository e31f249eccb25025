//! File logging.
//!
//! The boot screen owns the terminal, so logs go to
//! `$BOOTSEQ_HOME/logs/bootseq.log`. The filter comes from `BOOTSEQ_LOG`
//! (same syntax as `RUST_LOG`) and defaults to `info`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "BOOTSEQ_LOG";
pub const LOG_FILE: &str = "bootseq.log";

/// Keeps the background writer alive; logs are flushed when dropped.
#[must_use = "logs stop being written once the guard is dropped"]
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Installs the global subscriber writing to `dir/bootseq.log`.
///
/// # Errors
/// Returns an error if the directory cannot be created or a global
/// subscriber is already installed.
pub fn init(dir: &Path) -> Result<LogGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(LogGuard { _guard: guard })
}
