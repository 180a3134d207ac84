//! Symbol registry with a lazily fetched, process-lifetime pair table.

use crate::error::{RegistryError, RegistryResult};
use crate::table::PairTable;
use kpa_core::ResolvedPair;
use kpa_rest::{PublicClient, PublicRequest};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Endpoint serving the pair metadata table.
const ASSET_PAIRS_ENDPOINT: &str = "AssetPairs";

/// Resolves user-facing pair names to exchange internal codes.
///
/// The table is fetched on first use and kept until `invalidate()`. The
/// mutex is held across the fetch, so concurrent first callers share one
/// request. A failed fetch leaves the cache empty and the next call retries.
pub struct SymbolRegistry {
    client: PublicClient,
    table: Mutex<Option<Arc<PairTable>>>,
}

impl SymbolRegistry {
    pub fn new(client: PublicClient) -> Self {
        Self {
            client,
            table: Mutex::new(None),
        }
    }

    /// Registry over a pre-built table (no fetch until invalidated).
    pub fn with_table(client: PublicClient, table: PairTable) -> Self {
        Self {
            client,
            table: Mutex::new(Some(Arc::new(table))),
        }
    }

    /// Cached table, fetching it if needed.
    pub async fn table(&self) -> RegistryResult<Arc<PairTable>> {
        let mut guard = self.table.lock().await;
        if let Some(table) = guard.as_ref() {
            return Ok(Arc::clone(table));
        }

        info!("Fetching pair metadata");
        let result = self
            .client
            .get_result(PublicRequest::new(ASSET_PAIRS_ENDPOINT))
            .await?;
        let table = Arc::new(PairTable::from_result(&result));
        info!(pair_count = table.len(), "Pair metadata cached");

        *guard = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Resolve `user_pair` ("BTC/EUR", "XBT/EUR", "XBTEUR", "btceur").
    pub async fn resolve(&self, user_pair: &str) -> RegistryResult<ResolvedPair> {
        let table = self.table().await?;
        let resolved = table
            .resolve(user_pair)
            .ok_or_else(|| RegistryError::UnknownPair(user_pair.to_string()))?;
        debug!(input = %user_pair, pair = %resolved, "Resolved pair");
        Ok(resolved)
    }

    /// Sorted names of all pairs quoted in `currency` (e.g. "EUR").
    pub async fn list_quoted_in(&self, currency: &str) -> RegistryResult<Vec<String>> {
        let table = self.table().await?;
        Ok(table.quoted_in(currency))
    }

    /// Drop the cached table; the next call refetches it.
    pub async fn invalidate(&self) {
        let mut guard = self.table.lock().await;
        if guard.take().is_some() {
            info!("Pair metadata cache invalidated");
        }
    }

    /// Number of indexed pairs, or `None` if the table is not loaded yet.
    pub async fn pair_count(&self) -> Option<usize> {
        self.table.lock().await.as_ref().map(|t| t.len())
    }
}
