//! Signal analyzer: bar sequence in, one weighted composite decision out.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::{
    composite_score, composite_signal, ma_signal, macd_signal, rsi_signal, Confidence,
    RsiThresholds, Signal, SignalWeights,
};
use crate::domain::snapshot::{IndicatorFrame, IndicatorParams, IndicatorSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub indicators: IndicatorParams,
    pub rsi_thresholds: RsiThresholds,
    pub weights: SignalWeights,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorParams::default(),
            rsi_thresholds: RsiThresholds::default(),
            weights: SignalWeights::default(),
            buy_threshold: 0.3,
            sell_threshold: -0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubSignals {
    pub ma_signal: Signal,
    pub rsi_signal: Signal,
    pub macd_signal: Signal,
}

/// Outcome of the three rule sets plus their weighted combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub sub_signals: SubSignals,
    pub score: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub ticker: String,
    pub current_price: f64,
    pub change_percent: f64,
    #[serde(rename = "signal")]
    pub composite_signal: Signal,
    pub score: f64,
    pub indicators: IndicatorSnapshot,
    #[serde(rename = "details")]
    pub sub_signals: SubSignals,
    pub timestamp: Option<NaiveDate>,
}

impl AnalysisResult {
    pub fn confidence(&self) -> Confidence {
        Confidence::from_score(self.score)
    }
}

/// Apply the trend, momentum and convergence rules to one snapshot.
pub fn evaluate(price: f64, snapshot: &IndicatorSnapshot, config: &AnalyzerConfig) -> Evaluation {
    let sub_signals = SubSignals {
        ma_signal: ma_signal(price, snapshot),
        rsi_signal: rsi_signal(snapshot.rsi, &config.rsi_thresholds),
        macd_signal: macd_signal(snapshot),
    };
    let score = composite_score(
        sub_signals.ma_signal,
        sub_signals.rsi_signal,
        sub_signals.macd_signal,
        &config.weights,
    );

    Evaluation {
        sub_signals,
        score,
        signal: composite_signal(score, config.buy_threshold, config.sell_threshold),
    }
}

/// Reject empty sequences and bars carrying non-finite prices.
pub fn validate_bars(ticker: &str, bars: &[PriceBar]) -> Result<(), SigtraderError> {
    if bars.is_empty() {
        return Err(SigtraderError::NoData {
            ticker: ticker.to_string(),
        });
    }
    for (index, bar) in bars.iter().enumerate() {
        if let Some(field) = bar.missing_field() {
            return Err(SigtraderError::MissingField {
                ticker: ticker.to_string(),
                index,
                field,
            });
        }
    }
    Ok(())
}

/// Analyze the most recent bar.
pub fn analyze(
    ticker: &str,
    bars: &[PriceBar],
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, SigtraderError> {
    let index = bars.len().saturating_sub(1);
    analyze_at(ticker, bars, index, config)
}

/// Analyze the bar at `index`, using only `bars[..=index]`.
pub fn analyze_at(
    ticker: &str,
    bars: &[PriceBar],
    index: usize,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, SigtraderError> {
    validate_bars(ticker, bars)?;
    if index >= bars.len() {
        return Err(SigtraderError::InsufficientData {
            ticker: ticker.to_string(),
            bars: bars.len(),
            minimum: index + 1,
        });
    }

    let history = &bars[..=index];
    let snapshot = IndicatorFrame::compute(history, &config.indicators)
        .snapshot_at(index)
        .unwrap_or_default();

    let bar = &history[index];
    let evaluation = evaluate(bar.close, &snapshot, config);
    let change_percent = match index.checked_sub(1).map(|i| history[i].close) {
        Some(previous) if previous != 0.0 => (bar.close - previous) / previous * 100.0,
        _ => 0.0,
    };

    debug!(
        ticker,
        date = %bar.date,
        signal = %evaluation.signal,
        score = evaluation.score,
        "analysis complete"
    );

    Ok(AnalysisResult {
        ticker: ticker.to_string(),
        current_price: bar.close,
        change_percent,
        composite_signal: evaluation.signal,
        score: evaluation.score,
        indicators: snapshot,
        sub_signals: evaluation.sub_signals,
        timestamp: Some(bar.date),
    })
}
