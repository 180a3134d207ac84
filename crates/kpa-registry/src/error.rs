//! Registry error types.

use kpa_rest::RestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown pair: {0}")]
    UnknownPair(String),

    #[error("Metadata fetch failed: {0}")]
    Rest(#[from] RestError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
