//! Public REST client: transport + envelope decoding + retry.

use crate::envelope::unwrap_envelope;
use crate::error::RestResult;
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, PublicRequest, PublicTransport};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Client for Kraken public endpoints.
///
/// Each call runs the transport request and envelope check inside the retry
/// policy, so an upstream error message is retried exactly like a dropped
/// connection.
#[derive(Clone)]
pub struct PublicClient {
    transport: Arc<dyn PublicTransport>,
    retry: RetryPolicy,
}

impl PublicClient {
    pub fn new(transport: Arc<dyn PublicTransport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    /// Client backed by `HttpTransport` for `base_url`.
    pub fn http(base_url: impl Into<String>, retry: RetryPolicy) -> RestResult<Self> {
        let transport = HttpTransport::new(base_url)?;
        Ok(Self::new(Arc::new(transport), retry))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// GET `request` and return its `result` object.
    pub async fn get_result(&self, request: PublicRequest) -> RestResult<Value> {
        let label = request.endpoint.clone();
        self.retry
            .run(&label, |attempt| {
                let request = request.clone();
                let transport = Arc::clone(&self.transport);
                async move {
                    debug!(endpoint = %request.endpoint, attempt, "Public request");
                    let body = transport.get(request).await?;
                    unwrap_envelope(body)
                }
            })
            .await
    }
}
