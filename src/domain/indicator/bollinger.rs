//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the trailing sample standard deviation from [`super::stddev`].
//! Default parameters: period=20, multiplier=2.0.

use super::{calculate_sma, calculate_stddev, Series};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

pub fn calculate_bollinger(values: &[f64], period: usize, stddev_mult: f64) -> BollingerSeries {
    let middle = calculate_sma(values, period);
    let stddev = calculate_stddev(values, period);

    let mut upper = Vec::with_capacity(values.len());
    let mut lower = Vec::with_capacity(values.len());

    for (m, s) in middle.iter().zip(&stddev) {
        match (m, s) {
            (Some(m), Some(s)) => {
                let band = stddev_mult * s;
                upper.push(Some(m + band));
                lower.push(Some(m - band));
            }
            _ => {
                upper.push(None);
                lower.push(None);
            }
        }
    }

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}
