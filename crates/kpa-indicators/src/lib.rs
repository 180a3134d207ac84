//! Technical indicators over OHLCV candles.
//!
//! Pure, side-effect-free calculations. Series functions return a vector
//! aligned index-for-index with their input, with `None` where the look-back
//! window is not yet satisfied; whole-input failures (zero period, too little
//! history) are `None` at the top level. [`compute`] folds the series into an
//! [`IndicatorSnapshot`](kpa_core::IndicatorSnapshot) and never fails.

pub mod atr;
pub mod cross;
pub mod ema;
pub mod engine;
pub mod rsi;
pub mod vwap;

pub use atr::atr;
pub use cross::ema_cross;
pub use ema::ema;
pub use engine::{compute, ATR_PERIOD, EMA_FAST, EMA_SLOW, RSI_PERIOD};
pub use rsi::rsi;
pub use vwap::vwap;

/// Most recent defined value of an aligned series.
pub fn last_defined(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}
