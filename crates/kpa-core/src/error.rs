//! Error types for kpa-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unsupported timeframe: {0} (expected one of 1m, 5m, 15m, 1h, 4h)")]
    UnsupportedTimeframe(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
