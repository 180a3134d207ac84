//! Core domain types for the Kraken paper agent.
//!
//! This crate provides the types shared by every stage of the pipeline:
//! - `Candle`: one OHLCV bucket as returned by the exchange
//! - `Timeframe`: supported candle intervals
//! - `PairInfo`, `ResolvedPair`: exchange pair metadata and resolution results
//! - `IndicatorSnapshot`, `EmaCross`: indicator output handed to the decision stage

pub mod candle;
pub mod error;
pub mod pair;
pub mod snapshot;
pub mod timeframe;

pub use candle::Candle;
pub use error::{CoreError, Result};
pub use pair::{PairInfo, ResolvedPair};
pub use snapshot::{EmaCross, IndicatorSnapshot};
pub use timeframe::Timeframe;
