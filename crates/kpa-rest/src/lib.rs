//! Kraken public REST boundary.
//!
//! - `PublicTransport`: dyn-compatible GET abstraction (reqwest or mock)
//! - `RetryPolicy`: bounded exponential backoff shared by every endpoint
//! - `envelope`: `{"error": [...], "result": {...}}` decoding
//! - `PublicClient`: transport + envelope + retry, used by the registry and feed

pub mod client;
pub mod envelope;
pub mod error;
pub mod retry;
pub mod transport;

pub use client::PublicClient;
pub use envelope::unwrap_envelope;
pub use error::{RestError, RestResult};
pub use retry::RetryPolicy;
pub use transport::{BoxFuture, HttpTransport, MockTransport, PublicRequest, PublicTransport};
