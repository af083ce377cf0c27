//! File-backed tracing setup. The terminal belongs to the UI, so nothing
//! is ever written to stdout or stderr while the app runs.

use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::constants::LOG_FILE_PREFIX;

/// Install a daily-rolling file subscriber under `log_dir`.
///
/// `RUST_LOG` takes precedence over `default_filter`. The returned guard
/// flushes pending lines when dropped; keep it alive until exit.
pub fn init(log_dir: &Path, default_filter: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    tracing::info!(log_dir = %log_dir.display(), "logging initialized");
    Ok(guard)
}
