//! Average True Range.
//!
//! TR[0] = high - low (no previous close);
//! TR[i] = max(high - low, |high - prev_close|, |low - prev_close|).
//! ATR(n) is the simple moving average of TR; first (n-1) outputs undefined.

use super::{calculate_sma, Series};

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Series {
    calculate_sma(&true_range(high, low, close), period)
}

pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let len = high.len().min(low.len()).min(close.len());
    (0..len)
        .map(|i| {
            let hl = high[i] - low[i];
            if i == 0 {
                hl
            } else {
                let prev_close = close[i - 1];
                hl.max((high[i] - prev_close).abs())
                    .max((low[i] - prev_close).abs())
            }
        })
        .collect()
}
