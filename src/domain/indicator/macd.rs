//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9. All EMAs are seeded with
//! their first input, so every output is defined from index 0.

use super::ema::ema_raw_values;
use super::Series;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

pub fn calculate_macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    if fast == 0 || slow == 0 || signal_period == 0 {
        let undefined = vec![None; values.len()];
        return MacdSeries {
            macd: undefined.clone(),
            signal: undefined.clone(),
            histogram: undefined,
        };
    }

    let ema_fast = ema_raw_values(values, fast);
    let ema_slow = ema_raw_values(values, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_raw_values(&macd_line, signal_period);

    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some(m - s))
        .collect();

    MacdSeries {
        macd: macd_line.into_iter().map(Some).collect(),
        signal: signal_line.into_iter().map(Some).collect(),
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::calculate_ema;

    fn standard_macd(values: &[f64]) -> MacdSeries {
        calculate_macd(values, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        let series = standard_macd(&rising(40));

        for i in 0..40 {
            let line = series.macd[i].unwrap();
            let signal = series.signal[i].unwrap();
            let histogram = series.histogram[i].unwrap();
            assert!((histogram - (line - signal)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];
        let series = calculate_macd(&values, 3, 5, 2);

        let ema_fast = calculate_ema(&values, 3);
        let ema_slow = calculate_ema(&values, 5);

        for i in 0..values.len() {
            let expected = ema_fast[i].unwrap() - ema_slow[i].unwrap();
            assert!(
                (series.macd[i].unwrap() - expected).abs() < f64::EPSILON,
                "MACD line mismatch at index {}",
                i
            );
        }
    }

    #[test]
    fn macd_starts_at_zero() {
        let series = standard_macd(&rising(5));
        assert_eq!(series.macd[0], Some(0.0));
        assert_eq!(series.signal[0], Some(0.0));
        assert_eq!(series.histogram[0], Some(0.0));
    }

    #[test]
    fn macd_rising_series_is_bullish() {
        let series = standard_macd(&rising(60));
        let last = 59;
        assert!(series.macd[last].unwrap() > 0.0);
        assert!(series.macd[last].unwrap() > series.signal[last].unwrap());
        assert!(series.histogram[last].unwrap() > 0.0);
    }

    #[test]
    fn macd_empty_values() {
        let series = standard_macd(&[]);
        assert!(series.macd.is_empty());
        assert!(series.signal.is_empty());
        assert!(series.histogram.is_empty());
    }

    #[test]
    fn macd_zero_period() {
        let values = [100.0, 101.0, 102.0];
        for series in [
            calculate_macd(&values, 0, 26, 9),
            calculate_macd(&values, 12, 0, 9),
            calculate_macd(&values, 12, 26, 0),
        ] {
            assert_eq!(series.macd, vec![None; 3]);
            assert_eq!(series.histogram, vec![None; 3]);
        }
    }

    #[test]
    fn macd_default_constants() {
        assert_eq!(DEFAULT_FAST, 12);
        assert_eq!(DEFAULT_SLOW, 26);
        assert_eq!(DEFAULT_SIGNAL, 9);
    }
}
