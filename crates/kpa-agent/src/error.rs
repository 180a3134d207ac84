//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] kpa_core::CoreError),

    #[error("REST client error: {0}")]
    Rest(#[from] kpa_rest::RestError),

    #[error("Registry error: {0}")]
    Registry(#[from] kpa_registry::RegistryError),

    #[error("Feed error: {0}")]
    Feed(#[from] kpa_feed::FeedError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] kpa_telemetry::TelemetryError),

    #[error("Live trading is disabled. Pass --paper to proceed.")]
    LiveTradingDisabled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
