//! Trailing standard deviation.
//!
//! Sample standard deviation (divides by n-1) over the last n values.
//! Warmup: first (n-1) outputs are undefined; n < 2 is undefined everywhere.

use super::Series;

pub fn calculate_stddev(values: &[f64], period: usize) -> Series {
    if period < 2 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            sample_stddev(&values[i + 1 - period..=i])
        })
        .collect()
}

/// Sample standard deviation of a slice; undefined below two observations.
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}
