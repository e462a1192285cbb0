//! Tabular indicator output: one named column per computed series.

use crate::domain::indicator::{
    calculate_atr, calculate_bollinger, calculate_ema, calculate_macd, calculate_obv,
    calculate_rsi, calculate_sma, calculate_stddev, calculate_stochastic, calculate_volume_sma,
    sma::DEFAULT_VOLUME_PERIOD, stochastic, IndicatorType, Series,
};
use crate::domain::ohlcv::{closes, highs, lows, volumes, PriceBar};
use crate::domain::snapshot::{IndicatorParams, MA_LONG, MA_MEDIUM, MA_SHORT};

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorColumn {
    pub name: String,
    pub values: Series,
}

impl IndicatorColumn {
    fn new(name: impl Into<String>, values: Series) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Every indicator the engine offers, parameterised from `params`.
pub fn full_indicator_set(params: &IndicatorParams) -> Vec<IndicatorType> {
    vec![
        IndicatorType::Sma(MA_SHORT),
        IndicatorType::Sma(MA_MEDIUM),
        IndicatorType::Sma(MA_LONG),
        IndicatorType::Ema(params.macd_fast),
        IndicatorType::Ema(params.macd_slow),
        IndicatorType::Rsi(params.rsi_period),
        IndicatorType::Macd {
            fast: params.macd_fast,
            slow: params.macd_slow,
            signal: params.macd_signal,
        },
        IndicatorType::Bollinger {
            period: params.bollinger_period,
            stddev_mult_x100: (params.bollinger_mult * 100.0).round() as u32,
        },
        IndicatorType::Stddev(params.bollinger_period),
        IndicatorType::Atr(params.atr_period),
        IndicatorType::Stochastic {
            period: stochastic::DEFAULT_PERIOD,
        },
        IndicatorType::Obv,
        IndicatorType::VolumeSma(DEFAULT_VOLUME_PERIOD),
    ]
}

/// Compute each indicator over `bars`. Multi-line indicators expand into
/// one column per line, suffixed with the line name.
pub fn compute_indicator_columns(bars: &[PriceBar], indicators: &[IndicatorType]) -> Vec<IndicatorColumn> {
    let close = closes(bars);
    let high = highs(bars);
    let low = lows(bars);

    let mut columns = Vec::new();
    for indicator in indicators {
        let name = indicator.to_string();
        match *indicator {
            IndicatorType::Sma(period) => {
                columns.push(IndicatorColumn::new(name, calculate_sma(&close, period)))
            }
            IndicatorType::Ema(period) => {
                columns.push(IndicatorColumn::new(name, calculate_ema(&close, period)))
            }
            IndicatorType::Rsi(period) => {
                columns.push(IndicatorColumn::new(name, calculate_rsi(&close, period)))
            }
            IndicatorType::Atr(period) => columns.push(IndicatorColumn::new(
                name,
                calculate_atr(&high, &low, &close, period),
            )),
            IndicatorType::Stddev(period) => {
                columns.push(IndicatorColumn::new(name, calculate_stddev(&close, period)))
            }
            IndicatorType::VolumeSma(period) => columns.push(IndicatorColumn::new(
                name,
                calculate_volume_sma(&volumes(bars), period),
            )),
            IndicatorType::Obv => {
                columns.push(IndicatorColumn::new(name, calculate_obv(&close, &volumes(bars))))
            }
            IndicatorType::Macd { fast, slow, signal } => {
                let macd = calculate_macd(&close, fast, slow, signal);
                columns.push(IndicatorColumn::new(format!("{} line", name), macd.macd));
                columns.push(IndicatorColumn::new(format!("{} signal", name), macd.signal));
                columns.push(IndicatorColumn::new(format!("{} histogram", name), macd.histogram));
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let bands = calculate_bollinger(&close, period, f64::from(stddev_mult_x100) / 100.0);
                columns.push(IndicatorColumn::new(format!("{} upper", name), bands.upper));
                columns.push(IndicatorColumn::new(format!("{} middle", name), bands.middle));
                columns.push(IndicatorColumn::new(format!("{} lower", name), bands.lower));
            }
            IndicatorType::Stochastic { period } => {
                let stoch = calculate_stochastic(&high, &low, &close, period);
                columns.push(IndicatorColumn::new(format!("{} %K", name), stoch.k));
                columns.push(IndicatorColumn::new(format!("{} %D", name), stoch.d));
            }
        }
    }
    columns
}
