//! Average True Range with Wilder smoothing.

use kpa_core::Candle;

/// True range of `candle` given the previous close.
pub fn true_range(candle: &Candle, prev_close: f64) -> f64 {
    (candle.high - candle.low)
        .max((candle.high - prev_close).abs())
        .max((candle.low - prev_close).abs())
}

/// ATR series aligned with `candles`.
///
/// The first value, at index `period`, is the mean true range of bars
/// `1..=period`; later values use Wilder smoothing. Returns `None` when
/// `period == 0` or there are fewer than `period + 1` candles.
pub fn atr(candles: &[Candle], period: usize) -> Option<Vec<Option<f64>>> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    // ranges[i - 1] belongs to candle i
    let ranges: Vec<f64> = candles
        .windows(2)
        .map(|w| true_range(&w[1], w[0].close))
        .collect();

    let n = period as f64;
    let mut prev = ranges[..period].iter().sum::<f64>() / n;

    let mut out = vec![None; candles.len()];
    out[period] = Some(prev);
    for i in period + 1..candles.len() {
        prev = (prev * (n - 1.0) + ranges[i - 1]) / n;
        out[i] = Some(prev);
    }

    Some(out)
}
