//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first value: EMA[0] = V[0],
//! EMA[i] = V[i]*k + EMA[i-1]*(1-k). Defined from index 0.

use super::Series;

pub fn calculate_ema(values: &[f64], period: usize) -> Series {
    if period == 0 {
        return vec![None; values.len()];
    }
    ema_raw_values(values, period).into_iter().map(Some).collect()
}

/// The recursion itself, for callers that chain EMAs (MACD).
pub(crate) fn ema_raw_values(values: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &value in values {
        let ema = match prev {
            None => value,
            Some(p) => value * k + p * (1.0 - k),
        };
        out.push(ema);
        prev = Some(ema);
    }

    out
}
