//! Mock Kraken public REST server for integration tests.
//!
//! Serves `/0/public/AssetPairs` and `/0/public/OHLC` and can:
//! - answer OHLC with a Kraken error envelope for the first N requests
//! - answer every OHLC request with HTTP 429
//! - record OHLC query strings

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

#[derive(Default)]
struct ExchangeState {
    candle_count: usize,
    asset_pairs_hits: AtomicUsize,
    ohlc_failures_left: AtomicUsize,
    rate_limited: AtomicBool,
    ohlc_queries: Mutex<Vec<HashMap<String, String>>>,
}

/// A mock exchange for testing.
pub struct MockExchange {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    state: Arc<ExchangeState>,
}

impl MockExchange {
    /// Start on an available port, serving `candle_count` ascending candles.
    pub async fn start(candle_count: usize) -> Self {
        let state = Arc::new(ExchangeState {
            candle_count,
            ..Default::default()
        });

        let app = Router::new()
            .route("/0/public/AssetPairs", get(asset_pairs))
            .route("/0/public/OHLC", get(ohlc))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx,
            state,
        }
    }

    /// Base URL for `HttpTransport`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer the next `n` OHLC requests with an upstream error.
    pub fn fail_next_ohlc(&self, n: usize) {
        self.state.ohlc_failures_left.store(n, Ordering::SeqCst);
    }

    /// Answer every OHLC request with HTTP 429.
    pub fn set_rate_limited(&self, on: bool) {
        self.state.rate_limited.store(on, Ordering::SeqCst);
    }

    pub fn asset_pairs_hits(&self) -> usize {
        self.state.asset_pairs_hits.load(Ordering::SeqCst)
    }

    pub async fn ohlc_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.ohlc_queries.lock().await.clone()
    }

    /// Shutdown the server.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

async fn asset_pairs(State(state): State<Arc<ExchangeState>>) -> Json<Value> {
    state.asset_pairs_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "error": [],
        "result": {
            "XXBTZEUR": {"altname": "XBTEUR", "wsname": "XBT/EUR", "base": "XXBT", "quote": "ZEUR"},
            "XETHZEUR": {"altname": "ETHEUR", "wsname": "ETH/EUR", "base": "XETH", "quote": "ZEUR"},
            "XXBTZUSD": {"altname": "XBTUSD", "wsname": "XBT/USD", "base": "XXBT", "quote": "ZUSD"},
            "XXBTZEUR.d": {"altname": "XBTEUR.d", "base": "XXBT", "quote": "ZEUR"}
        }
    }))
}

async fn ohlc(
    State(state): State<Arc<ExchangeState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let pair = query.get("pair").cloned().unwrap_or_default();
    state.ohlc_queries.lock().await.push(query);

    if state.rate_limited.load(Ordering::SeqCst) {
        return (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response();
    }

    let failing = state
        .ohlc_failures_left
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return Json(json!({"error": ["EService:Unavailable"]})).into_response();
    }

    // Newest first, with a malformed row, to exercise sorting and filtering
    let mut rows: Vec<Value> = (1..=state.candle_count)
        .rev()
        .map(|i| {
            let c = 100.0 + i as f64;
            json!([
                1_700_000_000 + i as i64 * 300,
                format!("{c:.1}"),
                format!("{:.1}", c + 1.0),
                format!("{:.1}", c - 1.0),
                format!("{c:.1}"),
                format!("{c:.1}"),
                "2.0",
                7
            ])
        })
        .collect();
    rows.push(json!([1_700_000_000, "bad", "1", "1", "1", "1", "1", 1]));

    let last = 1_700_000_000 + state.candle_count as i64 * 300;
    let mut result = serde_json::Map::new();
    result.insert(pair, Value::Array(rows));
    result.insert("last".to_string(), json!(last));

    Json(json!({"error": [], "result": result})).into_response()
}
