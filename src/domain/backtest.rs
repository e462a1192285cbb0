//! Backtest engine: replays history against the composite signal rule.
//!
//! Starting after the warm-up, each bar's composite signal drives a single
//! Flat/Long position that buys and sells at the bar's close. A position
//! still open at the final bar is reported, never force-closed.

use serde::Serialize;
use tracing::info;

use crate::domain::analyzer::{evaluate, validate_bars, AnalyzerConfig};
use crate::domain::error::SigtraderError;
use crate::domain::metrics::max_drawdown;
use crate::domain::ohlcv::{closes, PriceBar};
use crate::domain::position::{Position, Trade};
use crate::domain::signal::Signal;
use crate::domain::snapshot::IndicatorFrame;

pub const MIN_BACKTEST_BARS: usize = 50;

/// How the signal at each historical step is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    /// Only bars up to and including the current step are visible.
    #[default]
    WalkForward,
    /// The signal of the whole window's last bar is applied at every step.
    /// Looks ahead; kept for reproducing legacy results.
    FullWindow,
}

impl EvaluationMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "walk_forward" | "walkforward" => Some(EvaluationMode::WalkForward),
            "full_window" | "fullwindow" => Some(EvaluationMode::FullWindow),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationMode::WalkForward => "walk_forward",
            EvaluationMode::FullWindow => "full_window",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub warmup_bars: usize,
    pub mode: EvaluationMode,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            warmup_bars: MIN_BACKTEST_BARS,
            mode: EvaluationMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub ticker: String,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    #[serde(rename = "winning_rate")]
    pub win_rate: f64,
    /// Sum of per-trade percent returns (not compounded).
    pub total_return: f64,
    pub max_drawdown: f64,
    pub trades: Vec<Trade>,
    pub open_position: Position,
}

impl BacktestResult {
    fn from_trades(ticker: &str, trades: Vec<Trade>, open_position: Position, drawdown: f64) -> Self {
        let winning_trades = trades.iter().filter(|t| t.is_winner()).count();
        let total_trades = trades.len();
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        Self {
            ticker: ticker.to_string(),
            total_trades,
            winning_trades,
            losing_trades: total_trades - winning_trades,
            win_rate,
            total_return: trades.iter().map(|t| t.profit_percent).sum(),
            max_drawdown: drawdown,
            trades,
            open_position,
        }
    }
}

pub fn run_backtest(
    ticker: &str,
    bars: &[PriceBar],
    config: &BacktestConfig,
    analyzer: &AnalyzerConfig,
) -> Result<BacktestResult, SigtraderError> {
    validate_bars(ticker, bars)?;
    let warmup = config.warmup_bars.max(MIN_BACKTEST_BARS);
    if bars.len() < warmup {
        return Err(SigtraderError::InsufficientData {
            ticker: ticker.to_string(),
            bars: bars.len(),
            minimum: warmup,
        });
    }

    let frame = IndicatorFrame::compute(bars, &analyzer.indicators);
    let signal_at = |index: usize| -> Signal {
        let snapshot = frame.snapshot_at(index).unwrap_or_default();
        evaluate(bars[index].close, &snapshot, analyzer).signal
    };
    let full_window_signal = signal_at(bars.len() - 1);

    let mut position = Position::Flat;
    let mut trades = Vec::new();
    for (index, bar) in bars.iter().enumerate().skip(warmup) {
        let signal = match config.mode {
            EvaluationMode::WalkForward => signal_at(index),
            EvaluationMode::FullWindow => full_window_signal,
        };
        let (next, closed) = position.on_signal(signal, bar);
        position = next;
        trades.extend(closed);
    }

    let drawdown = max_drawdown(&closes(bars)).unwrap_or(0.0);
    let result = BacktestResult::from_trades(ticker, trades, position, drawdown);

    info!(
        ticker,
        mode = config.mode.as_str(),
        trades = result.total_trades,
        win_rate = result.win_rate,
        total_return = result.total_return,
        "backtest complete"
    );

    Ok(result)
}
