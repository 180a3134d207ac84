//! Transport abstraction for public GET endpoints.
//!
//! `PublicTransport` is dyn-compatible so the registry and feed can be driven
//! by the reqwest-backed `HttpTransport` in production and by `MockTransport`
//! in tests.

use crate::error::{RestError, RestResult};
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Default timeout for a single request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Path prefix of the public API.
const PUBLIC_PREFIX: &str = "/0/public";

/// A GET request against a public endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicRequest {
    /// Endpoint name (e.g. "AssetPairs", "OHLC").
    pub endpoint: String,
    /// Query parameters, in insertion order.
    pub query: Vec<(String, String)>,
}

impl PublicRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Look up a query parameter by key.
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Trait for issuing public GET requests.
///
/// Implementations return the decoded JSON body; envelope interpretation and
/// retries are layered on top by `PublicClient`.
pub trait PublicTransport: Send + Sync {
    fn get(&self, request: PublicRequest) -> BoxFuture<'_, RestResult<Value>>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url` (e.g. "https://api.kraken.com").
    pub fn new(base_url: impl Into<String>) -> RestResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| RestError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}/{}", self.base_url, PUBLIC_PREFIX, endpoint)
    }

    async fn send(&self, request: PublicRequest) -> RestResult<Value> {
        let url = self.url_for(&request.endpoint);
        debug!(%url, query = ?request.query, "GET");

        let response = self
            .client
            .get(&url)
            .query(&request.query)
            .send()
            .await
            .map_err(|e| RestError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RestError::RateLimited(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RestError::Transport(format!("HTTP {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RestError::Upstream(format!("Malformed response body: {e}")))
    }
}

impl PublicTransport for HttpTransport {
    fn get(&self, request: PublicRequest) -> BoxFuture<'_, RestResult<Value>> {
        Box::pin(self.send(request))
    }
}

/// Scripted transport for tests.
///
/// Responses are served in FIFO order regardless of endpoint; every request is
/// recorded for verification. An exhausted script yields a transport error.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<RestResult<Value>>>,
    requests: Mutex<Vec<PublicRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON body.
    pub fn push_json(&self, body: Value) {
        self.responses.lock().push_back(Ok(body));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: RestError) {
        self.responses.lock().push_back(Err(error));
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<PublicRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl PublicTransport for MockTransport {
    fn get(&self, request: PublicRequest) -> BoxFuture<'_, RestResult<Value>> {
        self.requests.lock().push(request);
        let next = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(RestError::Transport("mock script exhausted".to_string())));
        Box::pin(async move { next })
    }
}
