//! Pair metadata table with lookup indices.

use crate::naming::{flatten, normalize_pair, quote_matches};
use kpa_core::{PairInfo, ResolvedPair};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Raw `AssetPairs` entry. Only the naming fields are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAssetPair {
    #[serde(default)]
    pub altname: Option<String>,
    #[serde(default)]
    pub wsname: Option<String>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
}

/// Snapshot of the exchange pair table.
///
/// Only entries exposing both a `wsname` and a `quote` are indexed. Normalized
/// names are unique; on a collision the first entry in internal-code order
/// wins.
#[derive(Debug, Default)]
pub struct PairTable {
    /// Indexed entries by internal code.
    entries: HashMap<String, PairInfo>,
    /// Normalized name -> internal code.
    by_name: HashMap<String, String>,
    /// Flat alternate code -> internal code.
    by_altname: HashMap<String, String>,
}

impl PairTable {
    /// Build from the `result` object of an `AssetPairs` response.
    pub fn from_result(result: &Value) -> Self {
        let Some(object) = result.as_object() else {
            warn!("AssetPairs result is not an object, table is empty");
            return Self::default();
        };

        let mut raw: Vec<(String, RawAssetPair)> = object
            .iter()
            .filter_map(|(code, entry)| {
                match serde_json::from_value::<RawAssetPair>(entry.clone()) {
                    Ok(parsed) => Some((code.clone(), parsed)),
                    Err(e) => {
                        debug!(code = %code, error = %e, "Skipping unparseable pair entry");
                        None
                    }
                }
            })
            .collect();
        raw.sort_by(|a, b| a.0.cmp(&b.0));

        Self::from_raw(raw)
    }

    /// Build from `(internal_code, raw_entry)` pairs.
    pub fn from_raw(raw: impl IntoIterator<Item = (String, RawAssetPair)>) -> Self {
        let mut table = Self::default();
        let mut skipped = 0usize;

        for (code, entry) in raw {
            let (Some(wsname), Some(quote)) = (entry.wsname, entry.quote) else {
                skipped += 1;
                continue;
            };

            let name = normalize_pair(&wsname);
            if let Some(existing) = table.by_name.get(&name) {
                warn!(
                    name = %name,
                    kept = %existing,
                    dropped = %code,
                    "Duplicate normalized pair name"
                );
                continue;
            }

            let altname = entry
                .altname
                .map(|a| a.trim().to_ascii_uppercase())
                .unwrap_or_else(|| flatten(&wsname.to_ascii_uppercase()));

            table.by_name.insert(name.clone(), code.clone());
            table.by_altname.insert(altname.clone(), code.clone());
            table.entries.insert(
                code.clone(),
                PairInfo {
                    internal_code: code,
                    name,
                    altname,
                    quote,
                },
            );
        }

        debug!(
            indexed = table.entries.len(),
            skipped, "Built pair table"
        );
        table
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by internal code.
    pub fn get(&self, internal_code: &str) -> Option<&PairInfo> {
        self.entries.get(internal_code)
    }

    /// Resolve a user-supplied pair.
    ///
    /// Strategies, in order:
    /// 1. normalized name index ("xbt/eur" -> "BTC/EUR")
    /// 2. flat alternate code index ("XBTEUR")
    /// 3. scan of the name index with separators removed ("BTCEUR")
    pub fn resolve(&self, user_pair: &str) -> Option<ResolvedPair> {
        let normalized = normalize_pair(user_pair);
        if normalized.is_empty() {
            return None;
        }

        if let Some(info) = self.by_name.get(&normalized).and_then(|c| self.get(c)) {
            return Some(Self::resolved(info));
        }

        let flat = flatten(&normalized);
        if let Some(info) = self.by_altname.get(&flat).and_then(|c| self.get(c)) {
            return Some(Self::resolved(info));
        }

        self.by_name
            .iter()
            .find(|(name, _)| flatten(name) == flat)
            .and_then(|(_, code)| self.get(code))
            .map(Self::resolved)
    }

    /// Sorted, de-duplicated names of pairs quoted in `currency`.
    pub fn quoted_in(&self, currency: &str) -> Vec<String> {
        self.entries
            .values()
            .filter(|info| quote_matches(&info.quote, currency))
            .map(|info| info.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn resolved(info: &PairInfo) -> ResolvedPair {
        ResolvedPair::new(info.internal_code.clone(), info.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_result() -> Value {
        json!({
            "XXBTZEUR": {"altname": "XBTEUR", "wsname": "XBT/EUR", "base": "XXBT", "quote": "ZEUR"},
            "XETHZEUR": {"altname": "ETHEUR", "wsname": "ETH/EUR", "base": "XETH", "quote": "ZEUR"},
            "XETHXXBT": {"altname": "ETHXBT", "wsname": "ETH/XBT", "base": "XETH", "quote": "XXBT"},
            "SOLEUR":   {"altname": "SOLEUR", "wsname": "SOL/EUR", "base": "SOL", "quote": "EUR"},
            "XXBTZUSD": {"altname": "XBTUSD", "wsname": "XBT/USD", "base": "XXBT", "quote": "ZUSD"},
            "XXBTZEUR.d": {"altname": "XBTEUR.d", "base": "XXBT", "quote": "ZEUR"},
            "NOQUOTE": {"altname": "NOQ", "wsname": "NO/Q"}
        })
    }

    #[test]
    fn test_indexing_skips_incomplete_entries() {
        let table = PairTable::from_result(&sample_result());
        assert_eq!(table.len(), 5);
        assert!(table.get("XXBTZEUR.d").is_none());
        assert!(table.get("NOQUOTE").is_none());
    }

    #[test]
    fn test_resolve_by_name_with_alias() {
        let table = PairTable::from_result(&sample_result());
        let resolved = table.resolve("BTC/EUR").unwrap();
        assert_eq!(resolved.internal_code, "XXBTZEUR");
        assert_eq!(resolved.name, "BTC/EUR");

        // Exchange ticker in the input resolves to the same entry
        assert_eq!(table.resolve("xbt/eur").unwrap(), resolved);
    }

    #[test]
    fn test_resolve_by_altname() {
        let table = PairTable::from_result(&sample_result());
        let resolved = table.resolve("XBTEUR").unwrap();
        assert_eq!(resolved.internal_code, "XXBTZEUR");
        assert_eq!(resolved.name, "BTC/EUR");
    }

    #[test]
    fn test_resolve_by_flat_scan() {
        let table = PairTable::from_result(&sample_result());
        let resolved = table.resolve("btceur").unwrap();
        assert_eq!(resolved.internal_code, "XXBTZEUR");
        assert_eq!(resolved.name, "BTC/EUR");
    }

    #[test]
    fn test_resolve_unknown() {
        let table = PairTable::from_result(&sample_result());
        assert!(table.resolve("DOGE/JPY").is_none());
        assert!(table.resolve("").is_none());
    }

    #[test]
    fn test_quoted_in() {
        let table = PairTable::from_result(&sample_result());
        assert_eq!(table.quoted_in("EUR"), vec!["BTC/EUR", "ETH/EUR", "SOL/EUR"]);
        assert_eq!(table.quoted_in("BTC"), vec!["ETH/XBT"]);
        assert!(table.quoted_in("JPY").is_empty());
    }

    #[test]
    fn test_duplicate_normalized_name_keeps_first() {
        let raw = vec![
            (
                "AAA".to_string(),
                RawAssetPair {
                    altname: Some("XBTEUR".to_string()),
                    wsname: Some("XBT/EUR".to_string()),
                    base: None,
                    quote: Some("ZEUR".to_string()),
                },
            ),
            (
                "BBB".to_string(),
                RawAssetPair {
                    altname: Some("BTCEUR".to_string()),
                    wsname: Some("BTC/EUR".to_string()),
                    base: None,
                    quote: Some("EUR".to_string()),
                },
            ),
        ];
        let table = PairTable::from_raw(raw);
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve("BTC/EUR").unwrap().internal_code, "AAA");
    }

    #[test]
    fn test_non_object_result() {
        let table = PairTable::from_result(&json!([1, 2]));
        assert!(table.is_empty());
    }
}
