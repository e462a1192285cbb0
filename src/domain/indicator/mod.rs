//! Technical indicator implementations.
//!
//! Every indicator is a pure function over immutable, position-aligned
//! numeric sequences. Outputs always have the same length as the input and
//! use `None` for positions where the required window has not been filled
//! (or the value is otherwise undefined). No indicator looks ahead: the
//! value at index `i` depends only on inputs `0..=i`.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod stochastic;

pub use atr::calculate_atr;
pub use bollinger::{calculate_bollinger, BollingerSeries};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdSeries};
pub use obv::calculate_obv;
pub use rsi::calculate_rsi;
pub use sma::{calculate_sma, calculate_volume_sma, sma_of_series};
pub use stddev::calculate_stddev;
pub use stochastic::{calculate_stochastic, StochasticSeries};

use std::fmt;

/// An indicator output sequence; `None` marks an undefined position.
pub type Series = Vec<Option<f64>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Stddev(usize),
    VolumeSma(usize),
    Obv,
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic {
        period: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
            IndicatorType::Obv => write!(f, "OBV"),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Stochastic { period } => write!(f, "STOCHASTIC({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}

/// Mean of a window, undefined if any member is undefined.
pub(crate) fn window_mean(window: &[Option<f64>]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    let mut sum = 0.0;
    for value in window {
        sum += (*value)?;
    }
    Some(sum / window.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display_sma() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
    }

    #[test]
    fn indicator_type_display_macd() {
        let macd = IndicatorType::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12,26,9)");
    }

    #[test]
    fn indicator_type_display_bollinger() {
        let boll = IndicatorType::Bollinger {
            period: 20,
            stddev_mult_x100: 200,
        };
        assert_eq!(boll.to_string(), "BOLLINGER(20,2)");
    }

    #[test]
    fn indicator_type_display_volume() {
        assert_eq!(IndicatorType::VolumeSma(20).to_string(), "VOLUME_SMA(20)");
        assert_eq!(IndicatorType::Obv.to_string(), "OBV");
    }

    #[test]
    fn window_mean_all_defined() {
        let window = [Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(window_mean(&window), Some(2.0));
    }

    #[test]
    fn window_mean_propagates_undefined() {
        let window = [Some(1.0), None, Some(3.0)];
        assert_eq!(window_mean(&window), None);
        assert_eq!(window_mean(&[]), None);
    }
}
