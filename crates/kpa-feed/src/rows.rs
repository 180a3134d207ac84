//! OHLC row decoding.
//!
//! Rows arrive as `[time, open, high, low, close, vwap, volume, count]` with
//! prices and volume encoded as strings. Decoding is a lossy filter: rows
//! that are too short or carry a non-numeric field are discarded and counted,
//! never reported as errors.

use kpa_core::Candle;
use serde_json::Value;

/// Minimum fields in a row (`count` may be absent).
const MIN_ROW_FIELDS: usize = 7;

const TIME: usize = 0;
const OPEN: usize = 1;
const HIGH: usize = 2;
const LOW: usize = 3;
const CLOSE: usize = 4;
// index 5 is the exchange-computed vwap, unused
const VOLUME: usize = 6;

/// Outcome of decoding a batch of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRows {
    /// Decoded candles, in input order.
    pub candles: Vec<Candle>,
    /// Rows discarded as malformed.
    pub dropped: usize,
}

/// Pick the candle array out of an OHLC `result` object.
///
/// Prefers the exact `pair_code` key; otherwise the first array-valued entry
/// in response order (the exchange sometimes keys the result by a
/// differently-cased or aliased code; `preserve_order` keeps key order). `None` when the result holds no array at all.
pub fn select_candle_array<'a>(result: &'a Value, pair_code: &str) -> Option<&'a Vec<Value>> {
    let object = result.as_object()?;

    if let Some(rows) = object.get(pair_code).and_then(Value::as_array) {
        return Some(rows);
    }

    object.values().find_map(Value::as_array)
}

/// Decode one row, `None` if it is malformed.
pub fn parse_row(row: &Value) -> Option<Candle> {
    let fields = row.as_array()?;
    if fields.len() < MIN_ROW_FIELDS {
        return None;
    }

    Some(Candle {
        timestamp: parse_timestamp(&fields[TIME])?,
        open: parse_number(&fields[OPEN])?,
        high: parse_number(&fields[HIGH])?,
        low: parse_number(&fields[LOW])?,
        close: parse_number(&fields[CLOSE])?,
        volume: parse_number(&fields[VOLUME])?,
    })
}

/// Decode a batch of rows, discarding malformed ones.
pub fn parse_rows(rows: &[Value]) -> ParsedRows {
    let mut parsed = ParsedRows {
        candles: Vec::with_capacity(rows.len()),
        dropped: 0,
    };

    for row in rows {
        match parse_row(row) {
            Some(candle) => parsed.candles.push(candle),
            None => parsed.dropped += 1,
        }
    }

    parsed
}

fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| finite_seconds(n.as_f64()?)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| finite_seconds(s.parse::<f64>().ok()?))
        }
        _ => None,
    }
}

fn finite_seconds(secs: f64) -> Option<i64> {
    (secs.is_finite() && secs.abs() < i64::MAX as f64).then(|| secs.trunc() as i64)
}
