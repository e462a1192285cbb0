//! RSI (Relative Strength Index).
//!
//! Average gain/loss are simple trailing means of the last n price changes:
//! - gain = max(delta, 0), loss = max(-delta, 0)
//! - RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! - avg_loss == 0 and avg_gain > 0: RSI = 100
//! - avg_loss == 0 and avg_gain == 0: undefined
//!
//! Warmup: first n bars are undefined (need n price changes).

use super::Series;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(values: &[f64], period: usize) -> Series {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    // changes[j] is the move from values[j] to values[j + 1]
    let changes: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    for (i, slot) in out.iter_mut().enumerate().skip(period) {
        let window = &changes[i - period..i];
        let avg_gain = window.iter().map(|c| c.max(0.0)).sum::<f64>() / period as f64;
        let avg_loss = window.iter().map(|c| (-c).max(0.0)).sum::<f64>() / period as f64;

        *slot = if avg_loss == 0.0 {
            if avg_gain > 0.0 { Some(100.0) } else { None }
        } else {
            Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
        };
    }

    out
}
