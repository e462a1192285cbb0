//! Monte Carlo resampling of per-bar returns.
//!
//! Each trial draws `returns.len()` samples with replacement and compounds a
//! fixed starting capital through them. The random source is injected so a
//! seed reproduces a run exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use super::indicator::stddev::sample_stddev;
use super::metrics::{simple_returns, StatisticsConfig};

pub const DEFAULT_SIMULATIONS: usize = 1000;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloSummary {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub percentile_5: f64,
    pub percentile_95: f64,
}

/// Final capital of each trial.
pub fn simulate_final_capitals<R: Rng + ?Sized>(
    returns: &[f64],
    simulations: usize,
    initial_capital: f64,
    rng: &mut R,
) -> Vec<f64> {
    if returns.is_empty() {
        return Vec::new();
    }

    (0..simulations)
        .map(|_| {
            (0..returns.len()).fold(initial_capital, |capital, _| {
                let sample = returns[rng.gen_range(0..returns.len())];
                capital * (1.0 + sample)
            })
        })
        .collect()
}

/// Distribution summary; `None` for an empty sample. A single trial has a
/// standard deviation of zero.
pub fn summarize(values: &[f64]) -> Option<MonteCarloSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Some(MonteCarloSummary {
        mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
        std: sample_stddev(&sorted).unwrap_or(0.0),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        percentile_5: percentile(&sorted, 5.0),
        percentile_95: percentile(&sorted, 95.0),
    })
}

/// Linearly interpolated percentile of an ascending, non-empty slice.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

pub fn run_monte_carlo(closes: &[f64], config: &StatisticsConfig) -> Option<MonteCarloSummary> {
    let returns = simple_returns(closes);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let finals = simulate_final_capitals(
        &returns,
        config.simulations,
        config.initial_capital,
        &mut rng,
    );
    debug!(
        returns = returns.len(),
        simulations = finals.len(),
        seeded = config.seed.is_some(),
        "monte carlo complete"
    );
    summarize(&finals)
}
