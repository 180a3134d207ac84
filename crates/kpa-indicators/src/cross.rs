//! EMA12/EMA26 crossover labelling.

use kpa_core::EmaCross;

/// Label the latest bar of two aligned EMA series.
///
/// Compares the regime (bull / bear / flat) on the last bar with the one
/// before it. A change between two non-flat regimes is a fresh cross;
/// otherwise the current regime is reported. An undefined previous value
/// counts as flat. Returns `None` when the series lengths differ or either
/// latest value is undefined.
pub fn ema_cross(fast: &[Option<f64>], slow: &[Option<f64>]) -> Option<EmaCross> {
    if fast.len() != slow.len() {
        return None;
    }

    let last = fast.len().checked_sub(1)?;
    let now = regime(fast[last]?, slow[last]?);

    // missing previous value is flat, never 0.0, so no cross on the first bar
    let prev = last
        .checked_sub(1)
        .and_then(|i| Some(regime(fast[i]?, slow[i]?)))
        .unwrap_or(EmaCross::Flat);

    let label = match (prev, now) {
        (EmaCross::Bear, EmaCross::Bull) => EmaCross::BullCross,
        (EmaCross::Bull, EmaCross::Bear) => EmaCross::BearCross,
        _ => now,
    };
    Some(label)
}

fn regime(fast: f64, slow: f64) -> EmaCross {
    if fast > slow {
        EmaCross::Bull
    } else if fast < slow {
        EmaCross::Bear
    } else {
        EmaCross::Flat
    }
}
