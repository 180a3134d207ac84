//! Indicator snapshot assembly.

use crate::{atr, ema, ema_cross, last_defined, rsi, vwap};
use kpa_core::{Candle, IndicatorSnapshot};

pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;
pub const EMA_FAST: usize = 12;
pub const EMA_SLOW: usize = 26;

/// Compute the snapshot for the latest bar of `candles`.
///
/// `candles` must be ascending by timestamp. With fewer than two candles only
/// `price` and `timeframe` are set. Each indicator is otherwise filled as soon
/// as its own look-back is satisfied; VWAP is cumulative over the whole input.
pub fn compute(candles: &[Candle], timeframe: &str) -> IndicatorSnapshot {
    let price = candles.last().map(|c| c.close);
    let mut snapshot = IndicatorSnapshot::empty(price, timeframe);
    if candles.len() < 2 {
        return snapshot;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let fast = ema(&closes, EMA_FAST);
    let slow = ema(&closes, EMA_SLOW);

    snapshot.ema12 = fast.as_deref().and_then(last_defined);
    snapshot.ema26 = slow.as_deref().and_then(last_defined);
    snapshot.rsi = rsi(&closes, RSI_PERIOD).as_deref().and_then(last_defined);
    snapshot.atr = atr(candles, ATR_PERIOD).as_deref().and_then(last_defined);
    snapshot.vwap = vwap(candles, None);

    if let (Some(fast), Some(slow)) = (&fast, &slow) {
        snapshot.ema_cross = ema_cross(fast, slow);
    }

    snapshot
}
