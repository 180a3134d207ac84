//! REST error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),
}

impl RestError {
    /// Whether another attempt may succeed.
    ///
    /// Client construction failures are permanent; everything observed on the
    /// wire (including upstream error messages) is retried.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::HttpClient(_))
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HttpClient(_) => "http_client",
            Self::Transport(_) => "transport",
            Self::Upstream(_) => "upstream",
            Self::RateLimited(_) => "rate_limited",
        }
    }
}

pub type RestResult<T> = Result<T, RestError>;
