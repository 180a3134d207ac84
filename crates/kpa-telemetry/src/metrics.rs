//! Prometheus metrics for the Kraken paper agent.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A registration failure
//! means duplicate metric names, a programming error that should crash at
//! first use rather than silently drop observations.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram, CounterVec, Encoder,
    GaugeVec, Histogram, TextEncoder,
};

/// Pipeline cycles by outcome (ok / skipped / failed).
pub static CYCLES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "kpa_cycles_total",
        "Total pipeline cycles by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Cycle wall-clock duration in milliseconds.
pub static CYCLE_DURATION_MS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "kpa_cycle_duration_ms",
        "Pipeline cycle duration in milliseconds",
        vec![10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap()
});

/// REST retries by endpoint.
pub static REST_RETRIES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "kpa_rest_retries_total",
        "Total REST request retries",
        &["endpoint"]
    )
    .unwrap()
});

/// REST requests that exhausted the retry budget, by endpoint and error kind.
pub static REST_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "kpa_rest_failures_total",
        "Total REST requests failed after retries",
        &["endpoint", "kind"]
    )
    .unwrap()
});

/// Candles returned by the latest fetch, per pair.
pub static CANDLES_FETCHED: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "kpa_candles_fetched",
        "Candles returned by the latest OHLC fetch",
        &["pair"]
    )
    .unwrap()
});

/// Malformed OHLC rows discarded, per pair.
pub static ROWS_DROPPED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "kpa_ohlc_rows_dropped_total",
        "Total malformed OHLC rows discarded",
        &["pair"]
    )
    .unwrap()
});

/// Last close price, per pair.
pub static LAST_PRICE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("kpa_last_price", "Last close price", &["pair"]).unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a finished cycle.
    pub fn cycle(outcome: &str, duration_ms: f64) {
        CYCLES_TOTAL.with_label_values(&[outcome]).inc();
        CYCLE_DURATION_MS.observe(duration_ms);
    }

    /// Record a REST retry.
    pub fn rest_retry(endpoint: &str) {
        REST_RETRIES_TOTAL.with_label_values(&[endpoint]).inc();
    }

    /// Record a REST request that exhausted its retries.
    pub fn rest_failure(endpoint: &str, kind: &str) {
        REST_FAILURES_TOTAL
            .with_label_values(&[endpoint, kind])
            .inc();
    }

    /// Record the outcome of an OHLC fetch.
    pub fn candles_fetched(pair: &str, kept: usize, dropped: usize) {
        CANDLES_FETCHED.with_label_values(&[pair]).set(kept as f64);
        if dropped > 0 {
            ROWS_DROPPED_TOTAL
                .with_label_values(&[pair])
                .inc_by(dropped as f64);
        }
    }

    /// Update last price.
    pub fn last_price(pair: &str, price: f64) {
        LAST_PRICE.with_label_values(&[pair]).set(price);
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_recorded_metrics() {
        Metrics::cycle("ok", 12.0);
        Metrics::rest_retry("OHLC");
        Metrics::candles_fetched("XXBTZEUR", 200, 2);
        Metrics::last_price("XXBTZEUR", 42_000.0);

        let text = Metrics::render().unwrap();
        assert!(text.contains("kpa_cycles_total"));
        assert!(text.contains("kpa_rest_retries_total"));
        assert!(text.contains("kpa_ohlc_rows_dropped_total"));
        assert!(text.contains("kpa_last_price"));
    }
}
