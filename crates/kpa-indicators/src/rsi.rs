//! Relative Strength Index with Wilder smoothing.
//!
//! The first value sits at index `period`: average gain and loss over the
//! first `period` deltas, then `avg = (avg * (period - 1) + x) / period`.
//! A zero average loss gives 100, including on a flat series.

/// RSI series aligned with `closes`.
///
/// Returns `None` when `period == 0` or there are fewer than `period + 1`
/// closes.
pub fn rsi(closes: &[f64], period: usize) -> Option<Vec<Option<f64>>> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            (delta.max(0.0), (-delta).max(0.0))
        })
        .unzip();

    let n = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / n;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / n;

    let mut out = vec![None; closes.len()];
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    // gains[i - 1] is the delta ending at close i
    for i in period + 1..closes.len() {
        avg_gain = (avg_gain * (n - 1.0) + gains[i - 1]) / n;
        avg_loss = (avg_loss * (n - 1.0) + losses[i - 1]) / n;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    Some(out)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
