//! Integration tests for kpa-agent.
//!
//! These run the full pipeline over the real reqwest transport:
//! - pair resolution against a served AssetPairs table
//! - OHLC fetch, retry and rate-limit handling
//! - indicator snapshot and decision flow

pub mod common;
