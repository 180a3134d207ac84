//! Prometheus metrics and structured logging for the Kraken paper agent.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//!   plus an optional rotating log file
//! - Prometheus collectors for pipeline cycles and REST health

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{file_writer, init_logging};
pub use tracing_appender::non_blocking::WorkerGuard;
pub use metrics::Metrics;
