//! Structured logging initialization.

use crate::error::{TelemetryError, TelemetryResult};
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name prefix inside the log directory.
pub const LOG_FILE_PREFIX: &str = "app";
/// Log file name suffix inside the log directory.
pub const LOG_FILE_SUFFIX: &str = "log";
/// Rotated files kept besides the active one.
pub const LOG_FILE_BACKUPS: usize = 3;

/// Initialize structured logging.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` (e.g. "info") is
/// applied globally with debug output for the `kpa` crates. Console output is
/// JSON when `RUST_ENV=production`, pretty otherwise. With `log_dir`, events
/// are also written as plain text to a daily-rotated `app.<date>.log` there.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// life of the process.
pub fn init_logging(
    default_level: &str,
    log_dir: Option<&Path>,
) -> TelemetryResult<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(default_level)))
        .map_err(|e| TelemetryError::LoggingInit(format!("invalid log filter: {e}")))?;

    let (file_writer, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) = file_writer(dir)?;
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };
    let file_layer = file_writer.map(|writer| fmt::layer().with_writer(writer).with_ansi(false));

    let is_production = std::env::var("RUST_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let result = if is_production {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(fmt::layer().pretty().with_target(true))
            .try_init()
    };
    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    info!(
        production = is_production,
        log_dir = ?log_dir.map(Path::display),
        "Logging initialized"
    );
    Ok(guard)
}

/// Rotating file appender in `dir` behind a non-blocking writer.
///
/// Creates `dir` if needed.
pub fn file_writer(dir: &Path) -> TelemetryResult<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir).map_err(|e| {
        TelemetryError::LoggingInit(format!("cannot create log dir {}: {e}", dir.display()))
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(LOG_FILE_BACKUPS + 1)
        .build(dir)
        .map_err(|e| TelemetryError::LoggingInit(format!("log file appender: {e}")))?;

    Ok(tracing_appender::non_blocking(appender))
}

fn default_directives(level: &str) -> String {
    match level.trim() {
        "" => "info".to_string(),
        // "debug"/"trace" already cover the kpa crates
        "debug" | "trace" => level.trim().to_string(),
        other => format!("{other},kpa=debug"),
    }
}
