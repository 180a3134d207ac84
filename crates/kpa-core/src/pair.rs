//! Trading pair metadata types.
//!
//! Kraken identifies a pair three ways: an internal code (`XXBTZEUR`), a
//! separator form (`wsname`, `XBT/EUR`) and a flat form (`altname`, `XBTEUR`).
//! The user-facing name is the separator form with base aliases resolved
//! (`BTC/EUR`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One indexed entry of the pair metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairInfo {
    /// Exchange internal code, used as the `pair` parameter for OHLC.
    pub internal_code: String,
    /// Normalized user-facing name ("BTC/EUR").
    pub name: String,
    /// Flat alternate code ("XBTEUR").
    pub altname: String,
    /// Raw quote currency code as reported by the exchange ("ZEUR").
    pub quote: String,
}

/// Result of resolving a user-supplied pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedPair {
    /// Exchange internal code.
    pub internal_code: String,
    /// Normalized user-facing name.
    pub name: String,
}

impl ResolvedPair {
    pub fn new(internal_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            internal_code: internal_code.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResolvedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.internal_code)
    }
}
