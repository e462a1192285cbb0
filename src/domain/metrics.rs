//! Risk statistics over a close-price series.
//!
//! These are independent of the backtest state machine: each one reads the
//! whole requested window and returns `None` when it cannot be defined.

use serde::Serialize;

use super::monte_carlo::{run_monte_carlo, MonteCarloSummary, DEFAULT_INITIAL_CAPITAL, DEFAULT_SIMULATIONS};
use super::ohlcv::{closes, PriceBar};
use crate::domain::indicator::stddev::sample_stddev;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

const MIN_STDDEV: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsConfig {
    pub risk_free_rate: f64,
    pub simulations: usize,
    pub initial_capital: f64,
    /// Fixed seed for reproducible Monte Carlo runs.
    pub seed: Option<u64>,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            simulations: DEFAULT_SIMULATIONS,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub ticker: String,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub monte_carlo: Option<MonteCarloSummary>,
}

/// Per-bar simple returns `close[t] / close[t-1] - 1`. Pairs with a zero
/// previous close have no defined return and are skipped.
pub fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Annualized Sharpe ratio. Undefined with fewer than two returns or a
/// (numerically) zero standard deviation.
pub fn sharpe_ratio(closes: &[f64], risk_free_rate: f64) -> Option<f64> {
    let returns = simple_returns(closes);
    let std = sample_stddev(&returns)?;
    if std < MIN_STDDEV {
        return None;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let annualized_mean = mean * TRADING_DAYS_PER_YEAR;
    let annualized_std = std * TRADING_DAYS_PER_YEAR.sqrt();
    Some((annualized_mean - risk_free_rate) / annualized_std)
}

/// Largest percentage decline from a running peak, as a value <= 0.
pub fn max_drawdown(closes: &[f64]) -> Option<f64> {
    let first = *closes.first()?;

    let mut peak = first;
    let mut worst = 0.0_f64;
    for &close in closes {
        if close > peak {
            peak = close;
        } else if peak > 0.0 {
            let drawdown = (close - peak) / peak;
            if drawdown < worst {
                worst = drawdown;
            }
        }
    }

    Some(worst * 100.0)
}

pub fn risk_report(ticker: &str, bars: &[PriceBar], config: &StatisticsConfig) -> RiskReport {
    let close = closes(bars);
    RiskReport {
        ticker: ticker.to_string(),
        sharpe_ratio: sharpe_ratio(&close, config.risk_free_rate),
        max_drawdown: max_drawdown(&close),
        monte_carlo: run_monte_carlo(&close, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn returns_skip_zero_previous_close() {
        let returns = simple_returns(&[100.0, 110.0, 0.0, 5.0, 10.0]);
        assert_eq!(returns.len(), 3);
        assert_relative_eq!(returns[0], 0.1);
        assert_relative_eq!(returns[1], -1.0);
        assert_relative_eq!(returns[2], 1.0);
    }

    #[test]
    fn max_drawdown_peak_to_trough() {
        let dd = max_drawdown(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]).unwrap();
        assert_relative_eq!(dd, (80.0 - 110.0) / 110.0 * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn max_drawdown_rising_is_zero() {
        assert_eq!(max_drawdown(&[1.0, 2.0, 2.0, 3.0]), Some(0.0));
    }

    #[test]
    fn max_drawdown_empty_is_undefined() {
        assert_eq!(max_drawdown(&[]), None);
    }

    #[test]
    fn sharpe_constant_prices_is_undefined() {
        assert_eq!(sharpe_ratio(&[100.0; 30], 0.02), None);
    }

    #[test]
    fn sharpe_constant_growth_is_undefined() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        assert_eq!(sharpe_ratio(&closes, 0.02), None);
    }

    #[test]
    fn sharpe_needs_two_returns() {
        assert_eq!(sharpe_ratio(&[100.0, 101.0], 0.0), None);
        assert_eq!(sharpe_ratio(&[100.0], 0.0), None);
    }

    #[test]
    fn sharpe_matches_hand_computation() {
        let closes = [100.0, 102.0, 101.0, 104.0];
        let returns = simple_returns(&closes);
        let mean = returns.iter().sum::<f64>() / 3.0;
        let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 2.0;
        let expected = (mean * 252.0 - 0.02) / (var.sqrt() * 252.0_f64.sqrt());

        assert_relative_eq!(sharpe_ratio(&closes, 0.02).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn risk_report_bundles_statistics() {
        let bars: Vec<PriceBar> = [100.0, 105.0, 98.0, 110.0, 107.0]
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1 + i as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 0,
            })
            .collect();
        let config = StatisticsConfig {
            simulations: 50,
            seed: Some(7),
            ..Default::default()
        };
        let report = risk_report("6758", &bars, &config);

        assert_eq!(report.ticker, "6758");
        assert!(report.sharpe_ratio.is_some());
        assert!(report.max_drawdown.unwrap() < 0.0);
        assert!(report.monte_carlo.is_some());
    }

    proptest! {
        #[test]
        fn max_drawdown_never_positive(closes in prop::collection::vec(0.01f64..1e4, 1..100)) {
            let dd = max_drawdown(&closes).unwrap();
            prop_assert!(dd <= 0.0);
            prop_assert!(dd >= -100.0);
        }

        #[test]
        fn max_drawdown_zero_for_non_decreasing(mut closes in prop::collection::vec(0.01f64..1e4, 1..100)) {
            closes.sort_by(|a, b| a.total_cmp(b));
            prop_assert_eq!(max_drawdown(&closes), Some(0.0));
        }
    }
}
