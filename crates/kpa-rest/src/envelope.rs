//! Kraken response envelope decoding.
//!
//! Every public endpoint answers `{"error": [...], "result": {...}}`. A
//! non-empty error array is an application-level failure even on HTTP 200.

use crate::error::{RestError, RestResult};
use serde::Deserialize;
use serde_json::Value;

/// Substrings Kraken uses for throttling errors.
const RATE_LIMIT_MARKERS: [&str; 2] = ["rate limit", "too many requests"];

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    error: Vec<Value>,
    #[serde(default)]
    result: Option<Value>,
}

/// Extract `result` from a decoded response body.
///
/// Errors:
/// - `RateLimited` when any error message is a throttling message
/// - `Upstream` for any other non-empty error array, a body that is not an
///   envelope, or a missing `result`
pub fn unwrap_envelope(body: Value) -> RestResult<Value> {
    let envelope: Envelope = serde_json::from_value(body)
        .map_err(|e| RestError::Upstream(format!("Malformed envelope: {e}")))?;

    if !envelope.error.is_empty() {
        let message = envelope
            .error
            .iter()
            .map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; ");

        let lower = message.to_ascii_lowercase();
        if RATE_LIMIT_MARKERS.iter().any(|m| lower.contains(m)) {
            return Err(RestError::RateLimited(message));
        }
        return Err(RestError::Upstream(message));
    }

    envelope
        .result
        .ok_or_else(|| RestError::Upstream("Response missing result".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_returns_result() {
        let result = unwrap_envelope(json!({"error": [], "result": {"a": 1}})).unwrap();
        assert_eq!(result, json!({"a": 1}));
    }

    #[test]
    fn test_error_array_is_upstream() {
        let err = unwrap_envelope(json!({"error": ["EQuery:Unknown asset pair"]})).unwrap_err();
        match err {
            RestError::Upstream(msg) => assert_eq!(msg, "EQuery:Unknown asset pair"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rate_limit_message() {
        let err = unwrap_envelope(json!({"error": ["EAPI:Rate limit exceeded"], "result": {}}))
            .unwrap_err();
        assert!(matches!(err, RestError::RateLimited(_)));

        let err = unwrap_envelope(json!({"error": ["EGeneral:Too many requests"]})).unwrap_err();
        assert!(matches!(err, RestError::RateLimited(_)));
    }

    #[test]
    fn test_missing_result() {
        let err = unwrap_envelope(json!({"error": []})).unwrap_err();
        assert!(matches!(err, RestError::Upstream(_)));
    }

    #[test]
    fn test_not_an_envelope() {
        let err = unwrap_envelope(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, RestError::Upstream(_)));
    }
}
