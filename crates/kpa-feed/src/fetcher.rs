//! OHLC fetcher.

use crate::error::FeedResult;
use crate::rows::{parse_rows, select_candle_array};
use kpa_core::{Candle, Timeframe};
use kpa_rest::{PublicClient, PublicRequest};
use kpa_telemetry::Metrics;
use serde_json::Value;
use tracing::debug;

const OHLC_ENDPOINT: &str = "OHLC";

/// One OHLC response, normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OhlcPage {
    /// Candles ascending by timestamp, capped to the requested limit.
    pub candles: Vec<Candle>,
    /// `last` cursor for the next incremental request.
    pub last: Option<i64>,
}

/// Fetches candles for a resolved pair.
#[derive(Clone)]
pub struct CandleFetcher {
    client: PublicClient,
}

impl CandleFetcher {
    pub fn new(client: PublicClient) -> Self {
        Self { client }
    }

    /// Fetch up to `limit` most recent candles for `pair_code`.
    ///
    /// `since` is passed through as the exchange cursor. An absent candle
    /// array yields an empty vec, not an error.
    pub async fn fetch(
        &self,
        pair_code: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: usize,
    ) -> FeedResult<Vec<Candle>> {
        Ok(self
            .fetch_page(pair_code, timeframe, since, limit)
            .await?
            .candles)
    }

    /// [`fetch`](Self::fetch) with a timeframe label ("5m", "1h", ...).
    ///
    /// An unknown label fails with `UnsupportedTimeframe` before any request.
    pub async fn fetch_labeled(
        &self,
        pair_code: &str,
        timeframe: &str,
        since: Option<i64>,
        limit: usize,
    ) -> FeedResult<Vec<Candle>> {
        let timeframe = timeframe.parse::<Timeframe>()?;
        self.fetch(pair_code, timeframe, since, limit).await
    }

    /// Like [`fetch`](Self::fetch), also returning the `last` cursor.
    pub async fn fetch_page(
        &self,
        pair_code: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: usize,
    ) -> FeedResult<OhlcPage> {
        let mut request = PublicRequest::new(OHLC_ENDPOINT)
            .param("pair", pair_code)
            .param("interval", timeframe.interval_minutes());
        if let Some(since) = since {
            request = request.param("since", since);
        }

        let result = self.client.get_result(request).await?;
        let last = parse_cursor(result.get("last"));

        let Some(rows) = select_candle_array(&result, pair_code) else {
            debug!(pair = %pair_code, "OHLC result holds no candle array");
            Metrics::candles_fetched(pair_code, 0, 0);
            return Ok(OhlcPage {
                candles: Vec::new(),
                last,
            });
        };

        let parsed = parse_rows(rows);
        if parsed.dropped > 0 {
            debug!(
                pair = %pair_code,
                dropped = parsed.dropped,
                "Discarded malformed OHLC rows"
            );
        }

        let mut candles = parsed.candles;
        // sort_by_key is stable: equal timestamps keep arrival order
        candles.sort_by_key(|c| c.timestamp);
        if candles.len() > limit {
            candles.drain(..candles.len() - limit);
        }

        Metrics::candles_fetched(pair_code, candles.len(), parsed.dropped);
        debug!(
            pair = %pair_code,
            timeframe = %timeframe,
            count = candles.len(),
            newest = ?candles.last().and_then(Candle::time),
            ?last,
            "Fetched candles"
        );

        Ok(OhlcPage { candles, last })
    }
}

fn parse_cursor(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;
    use kpa_rest::{MockTransport, RestError, RetryPolicy};
    use serde_json::json;
    use std::sync::Arc;

    fn fetcher_with(mock: Arc<MockTransport>) -> CandleFetcher {
        CandleFetcher::new(PublicClient::new(mock, RetryPolicy::immediate(3)))
    }

    fn row(t: i64, close: &str) -> Value {
        json!([t, "1.0", "2.0", "0.5", close, "1.1", "10.0", 4])
    }

    #[tokio::test]
    async fn test_request_parameters() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(json!({"error": [], "result": {"XXBTZEUR": [], "last": 0}}));
        mock.push_json(json!({"error": [], "result": {"XXBTZEUR": [], "last": 0}}));
        let fetcher = fetcher_with(mock.clone());

        fetcher
            .fetch("XXBTZEUR", Timeframe::H1, None, 10)
            .await
            .unwrap();
        fetcher
            .fetch("XXBTZEUR", Timeframe::M15, Some(1_700_000_000), 10)
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].endpoint, "OHLC");
        assert_eq!(requests[0].get_param("pair"), Some("XXBTZEUR"));
        assert_eq!(requests[0].get_param("interval"), Some("60"));
        assert_eq!(requests[0].get_param("since"), None);
        assert_eq!(requests[1].get_param("interval"), Some("15"));
        assert_eq!(requests[1].get_param("since"), Some("1700000000"));
    }

    #[tokio::test]
    async fn test_sorts_and_keeps_most_recent() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(json!({
            "error": [],
            "result": {
                "XXBTZEUR": [row(300, "3"), row(100, "1"), row(400, "4"), row(200, "2")],
                "last": 400
            }
        }));

        let page = fetcher_with(mock)
            .fetch_page("XXBTZEUR", Timeframe::M5, None, 3)
            .await
            .unwrap();

        let times: Vec<_> = page.candles.iter().map(|c| c.timestamp).collect();
        assert_eq!(times, vec![200, 300, 400]);
        assert_eq!(page.last, Some(400));
    }

    #[tokio::test]
    async fn test_duplicate_timestamps_pass_through_in_order() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(json!({
            "error": [],
            "result": {"XXBTZEUR": [row(100, "1"), row(100, "2"), row(50, "0")]}
        }));

        let candles = fetcher_with(mock)
            .fetch("XXBTZEUR", Timeframe::M1, None, 10)
            .await
            .unwrap();

        let closes: Vec<_> = candles.iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![0.0, 1.0, 2.0]);
    }

    #[tokio::test]
    async fn test_falls_back_to_first_array_key() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(json!({
            "error": [],
            "result": {"XXBTZEUR": [row(100, "1")], "last": "100"}
        }));

        let page = fetcher_with(mock)
            .fetch_page("XBTEUR", Timeframe::M5, None, 10)
            .await
            .unwrap();
        assert_eq!(page.candles.len(), 1);
        assert_eq!(page.last, Some(100));
    }

    #[tokio::test]
    async fn test_missing_array_is_empty() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(json!({"error": [], "result": {"last": 1}}));

        let candles = fetcher_with(mock)
            .fetch("XXBTZEUR", Timeframe::M5, None, 10)
            .await
            .unwrap();
        assert!(candles.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_rows_dropped() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(json!({
            "error": [],
            "result": {"XXBTZEUR": [row(100, "1"), row(200, "bad"), [300, "1"]]}
        }));

        let candles = fetcher_with(mock)
            .fetch("XXBTZEUR", Timeframe::M5, None, 10)
            .await
            .unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].timestamp, 100);
    }

    #[tokio::test]
    async fn test_limit_zero() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(json!({"error": [], "result": {"XXBTZEUR": [row(100, "1")]}}));

        let candles = fetcher_with(mock)
            .fetch("XXBTZEUR", Timeframe::M5, None, 0)
            .await
            .unwrap();
        assert!(candles.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_timeframe_label() {
        let mock = Arc::new(MockTransport::new());
        let fetcher = fetcher_with(mock.clone());

        let err = fetcher
            .fetch_labeled("XXBTZEUR", "2h", None, 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FeedError::Core(kpa_core::CoreError::UnsupportedTimeframe(_))
        ));
        assert_eq!(mock.request_count(), 0);

        mock.push_json(json!({"error": [], "result": {"XXBTZEUR": [row(100, "1")]}}));
        let candles = fetcher
            .fetch_labeled("XXBTZEUR", "4H", None, 10)
            .await
            .unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(mock.requests()[0].get_param("interval"), Some("240"));
    }

    #[tokio::test]
    async fn test_upstream_error_after_retries() {
        let mock = Arc::new(MockTransport::new());
        for _ in 0..3 {
            mock.push_json(json!({"error": ["EQuery:Unknown asset pair"]}));
        }

        let err = fetcher_with(mock.clone())
            .fetch("NOPE", Timeframe::M5, None, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, FeedError::Rest(RestError::Upstream(_))));
        assert_eq!(mock.request_count(), 3);
    }

    #[tokio::test]
    async fn test_recovers_after_transport_error() {
        let mock = Arc::new(MockTransport::new());
        mock.push_error(RestError::Transport("connection reset".to_string()));
        mock.push_json(json!({"error": [], "result": {"XXBTZEUR": [row(100, "1")]}}));

        let candles = fetcher_with(mock.clone())
            .fetch("XXBTZEUR", Timeframe::M5, None, 10)
            .await
            .unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(mock.request_count(), 2);
    }
}
