//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(V[i-n+1..=i]); the first (n-1) outputs are undefined.

use super::{window_mean, Series};

pub const DEFAULT_VOLUME_PERIOD: usize = 20;

pub fn calculate_sma(values: &[f64], period: usize) -> Series {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            Some(window.iter().sum::<f64>() / period as f64)
        })
        .collect()
}

/// SMA over a sequence that may itself contain undefined entries. A window
/// touching any undefined entry yields an undefined output.
pub fn sma_of_series(series: &[Option<f64>], period: usize) -> Series {
    if period == 0 {
        return vec![None; series.len()];
    }

    (0..series.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                window_mean(&series[i + 1 - period..=i])
            }
        })
        .collect()
}

/// Moving average of traded volume.
pub fn calculate_volume_sma(volume: &[f64], period: usize) -> Series {
    calculate_sma(volume, period)
}
