//! Stochastic Oscillator.
//!
//! %K = (C - lowest_low(n)) / (highest_high(n) - lowest_low(n)) * 100
//! %D = SMA(3) of %K
//!
//! %K is undefined until n bars are available and wherever the n-bar
//! high/low range is zero.

use super::{sma_of_series, Series};

pub const DEFAULT_PERIOD: usize = 14;
pub const D_PERIOD: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Series,
    pub d: Series,
}

pub fn calculate_stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
) -> StochasticSeries {
    let len = high.len().min(low.len()).min(close.len());
    let mut k = vec![None; len];

    if period > 0 {
        for (i, slot) in k.iter_mut().enumerate().skip(period - 1) {
            let start = i + 1 - period;
            let lowest = low[start..=i].iter().copied().fold(f64::INFINITY, f64::min);
            let highest = high[start..=i]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let range = highest - lowest;
            if range > 0.0 {
                *slot = Some((close[i] - lowest) / range * 100.0);
            }
        }
    }

    let d = sma_of_series(&k, D_PERIOD);
    StochasticSeries { k, d }
}
