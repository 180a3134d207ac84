//! OHLC candle acquisition.
//!
//! Fetches candles from the public OHLC endpoint, tolerates the exchange's
//! inconsistent result keys and string-encoded numbers, and returns a
//! time-ordered, length-capped candle sequence.

pub mod error;
pub mod fetcher;
pub mod rows;

pub use error::{FeedError, FeedResult};
pub use fetcher::{CandleFetcher, OhlcPage};
pub use rows::{parse_row, parse_rows, select_candle_array, ParsedRows};
