//! Volume-weighted average of the typical price `(h + l + c) / 3`.

use kpa_core::Candle;

/// VWAP over all candles, or the last `window` of them.
///
/// `Some(0)` is treated as no window. Returns `None` for an empty input or a
/// zero total volume.
pub fn vwap(candles: &[Candle], window: Option<usize>) -> Option<f64> {
    let data = match window {
        Some(n) if n > 0 && n < candles.len() => &candles[candles.len() - n..],
        _ => candles,
    };

    let (weighted, volume) = data.iter().fold((0.0, 0.0), |(num, den), c| {
        (num + c.typical_price() * c.volume, den + c.volume)
    });

    if volume == 0.0 {
        return None;
    }
    Some(weighted / volume)
}
