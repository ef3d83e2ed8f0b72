//! Logging and tracing configuration
//!
//! The CLI logs to stderr so stdout carries only peer responses.
//! With `--log-file` a second, more detailed layer is written to the log
//! directory through a non-blocking appender.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::paths;

/// Log file name inside the log directory
const LOG_FILE_NAME: &str = "socket-driver.log";

/// `RUST_LOG` if set, otherwise INFO for this crate and WARN for dependencies
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("socket_driver=info,warn"))
}

/// Initialize tracing for the CLI (stderr logging)
pub fn init_cli() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Initialize tracing for the CLI with an additional log file
///
/// The log file lives at `<data dir>/logs/socket-driver.log`. The returned
/// guard must be held until exit so buffered lines are flushed. Falls back to
/// stderr-only logging when the log directory is unavailable.
pub fn init_with_file() -> Option<(PathBuf, WorkerGuard)> {
    let Some(log_dir) = paths::log_dir() else {
        init_cli();
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        init_cli();
        return None;
    }

    let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // File logging with full details
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Some((log_dir.join(LOG_FILE_NAME), guard))
}
