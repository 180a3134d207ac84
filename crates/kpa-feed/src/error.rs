//! Feed error types.

use kpa_core::CoreError;
use kpa_rest::RestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("OHLC fetch failed: {0}")]
    Rest(#[from] RestError),
}

pub type FeedResult<T> = Result<T, FeedError>;
