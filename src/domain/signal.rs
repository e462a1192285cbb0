//! Trading signals and the rule tables that produce them.
//!
//! Each rule is an ordered list of guards evaluated top to bottom; the first
//! matching guard decides. Guards are not mutually exclusive, so their order
//! is part of the rule.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::snapshot::IndicatorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    /// Evaluated, no actionable bias.
    Hold,
    /// Could not be evaluated (inputs undefined).
    Neutral,
}

impl Signal {
    pub fn score(self) -> f64 {
        match self {
            Signal::Buy => 1.0,
            Signal::Sell => -1.0,
            Signal::Hold | Signal::Neutral => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Buy => "buy",
            Signal::Sell => "sell",
            Signal::Hold => "hold",
            Signal::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Bucket for the magnitude of a composite score.
    pub fn from_score(score: f64) -> Self {
        let magnitude = score.abs();
        if magnitude >= 0.7 {
            Confidence::VeryHigh
        } else if magnitude > 0.5 {
            Confidence::High
        } else if magnitude > 0.3 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::VeryHigh => "very_high",
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalWeights {
    pub ma: f64,
    pub rsi: f64,
    pub macd: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            ma: 0.4,
            rsi: 0.3,
            macd: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiThresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

/// Trend rule over the 5/20/50 moving averages.
pub fn ma_signal(price: f64, snapshot: &IndicatorSnapshot) -> Signal {
    let (Some(ma5), Some(ma20), Some(ma50)) = (snapshot.ma_5, snapshot.ma_20, snapshot.ma_50)
    else {
        return Signal::Neutral;
    };

    let rising = ma5 > ma20 && ma20 > ma50;
    let falling = ma5 < ma20 && ma20 < ma50;

    if rising && price > ma5 {
        Signal::Buy
    } else if falling && price < ma5 {
        Signal::Sell
    } else if rising {
        Signal::Buy
    } else if falling {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Momentum rule: oversold buys, overbought sells.
pub fn rsi_signal(rsi: Option<f64>, thresholds: &RsiThresholds) -> Signal {
    let Some(rsi) = rsi else {
        return Signal::Neutral;
    };

    if rsi < thresholds.oversold {
        Signal::Buy
    } else if rsi > thresholds.overbought {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Convergence rule over the MACD line, signal line and histogram.
pub fn macd_signal(snapshot: &IndicatorSnapshot) -> Signal {
    let (Some(macd), Some(signal), Some(histogram)) =
        (snapshot.macd, snapshot.macd_signal, snapshot.macd_histogram)
    else {
        return Signal::Neutral;
    };

    if histogram > 0.0 && macd > signal {
        Signal::Buy
    } else if histogram < 0.0 && macd < signal {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Weighted sum of the three sub-signal scores.
pub fn composite_score(ma: Signal, rsi: Signal, macd: Signal, weights: &SignalWeights) -> f64 {
    ma.score() * weights.ma + rsi.score() * weights.rsi + macd.score() * weights.macd
}

pub fn composite_signal(score: f64, buy_threshold: f64, sell_threshold: f64) -> Signal {
    if score > buy_threshold {
        Signal::Buy
    } else if score < sell_threshold {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
