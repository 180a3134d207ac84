//! Pair metadata cache and symbol resolution.
//!
//! Resolves user-facing pair names ("BTC/EUR", "XBTEUR") to exchange internal
//! codes using the `AssetPairs` table, fetched once and cached until
//! explicitly invalidated.

pub mod error;
pub mod naming;
pub mod registry;
pub mod table;

pub use error::{RegistryError, RegistryResult};
pub use registry::SymbolRegistry;
pub use table::{PairTable, RawAssetPair};
