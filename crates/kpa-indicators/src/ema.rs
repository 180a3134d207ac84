// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
//   k     = 2 / (period + 1)
//   EMA_t = value_t * k + EMA_{t-1} * (1 - k)
//
// Seeded at index `period - 1` with the SMA of the first `period` values.
// =============================================================================

/// EMA series aligned with `values`.
///
/// Indices before `period - 1` are `None`. Returns `None` when `period == 0`
/// or there are fewer than `period` values.
pub fn ema(values: &[f64], period: usize) -> Option<Vec<Option<f64>>> {
    if period == 0 || values.len() < period {
        return None;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = vec![None; values.len()];

    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(prev);

    for (i, &value) in values.iter().enumerate().skip(period) {
        prev = value * k + prev * (1.0 - k);
        out[i] = Some(prev);
    }

    Some(out)
}
