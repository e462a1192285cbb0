//! Point-in-time indicator values used by the signal rules.
//!
//! [`IndicatorFrame`] holds every series the analyzer reads, computed once
//! over a whole bar sequence. Since no indicator looks ahead, the snapshot it
//! yields at index `i` is identical to one computed over `bars[..=i]` alone,
//! which lets the backtester walk forward without recomputing prefixes.

use serde::Serialize;

use crate::domain::indicator::{
    atr, bollinger, calculate_atr, calculate_bollinger, calculate_macd, calculate_rsi,
    calculate_sma, macd, rsi, BollingerSeries, MacdSeries, Series,
};
use crate::domain::ohlcv::{closes, highs, lows, PriceBar};

pub const MA_SHORT: usize = 5;
pub const MA_MEDIUM: usize = 20;
pub const MA_LONG: usize = 50;

/// Window lengths for the indicators behind the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
    pub atr_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            bollinger_period: bollinger::DEFAULT_PERIOD,
            bollinger_mult: bollinger::DEFAULT_MULTIPLIER,
            atr_period: atr::DEFAULT_PERIOD,
        }
    }
}

/// Indicator values at one evaluation index. `None` means the indicator is
/// undefined there (not enough history), never a substituted zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub ma_5: Option<f64>,
    pub ma_20: Option<f64>,
    pub ma_50: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub atr: Option<f64>,
}

impl IndicatorSnapshot {
    /// Snapshot over the prefix `bars[..=index]`; `None` if out of range.
    pub fn compute(bars: &[PriceBar], index: usize, params: &IndicatorParams) -> Option<Self> {
        if index >= bars.len() {
            return None;
        }
        IndicatorFrame::compute(&bars[..=index], params).snapshot_at(index)
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub ma_5: Series,
    pub ma_20: Series,
    pub ma_50: Series,
    pub rsi: Series,
    pub macd: MacdSeries,
    pub bollinger: BollingerSeries,
    pub atr: Series,
}

impl IndicatorFrame {
    pub fn compute(bars: &[PriceBar], params: &IndicatorParams) -> Self {
        let close = closes(bars);
        let high = highs(bars);
        let low = lows(bars);

        Self {
            ma_5: calculate_sma(&close, MA_SHORT),
            ma_20: calculate_sma(&close, MA_MEDIUM),
            ma_50: calculate_sma(&close, MA_LONG),
            rsi: calculate_rsi(&close, params.rsi_period),
            macd: calculate_macd(&close, params.macd_fast, params.macd_slow, params.macd_signal),
            bollinger: calculate_bollinger(&close, params.bollinger_period, params.bollinger_mult),
            atr: calculate_atr(&high, &low, &close, params.atr_period),
        }
    }

    fn len(&self) -> usize {
        self.ma_5.len()
    }

    pub fn snapshot_at(&self, index: usize) -> Option<IndicatorSnapshot> {
        if index >= self.len() {
            return None;
        }
        Some(IndicatorSnapshot {
            ma_5: self.ma_5[index],
            ma_20: self.ma_20[index],
            ma_50: self.ma_50[index],
            rsi: self.rsi[index],
            macd: self.macd.macd[index],
            macd_signal: self.macd.signal[index],
            macd_histogram: self.macd.histogram[index],
            bb_upper: self.bollinger.upper[index],
            bb_middle: self.bollinger.middle[index],
            bb_lower: self.bollinger.lower[index],
            atr: self.atr[index],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn wavy(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn short_history_leaves_long_windows_undefined() {
        let bars = make_bars(&wavy(30));
        let snapshot = IndicatorSnapshot::compute(&bars, 29, &IndicatorParams::default()).unwrap();

        assert!(snapshot.ma_5.is_some());
        assert!(snapshot.ma_20.is_some());
        assert!(snapshot.ma_50.is_none());
        assert!(snapshot.rsi.is_some());
        assert!(snapshot.bb_middle.is_some());
        assert!(snapshot.atr.is_some());
    }

    #[test]
    fn single_bar_snapshot() {
        let bars = make_bars(&[100.0]);
        let snapshot = IndicatorSnapshot::compute(&bars, 0, &IndicatorParams::default()).unwrap();

        assert!(snapshot.ma_5.is_none());
        assert!(snapshot.rsi.is_none());
        assert!(snapshot.bb_upper.is_none());
        assert!(snapshot.atr.is_none());
        // EMAs are seeded from the first close
        assert_eq!(snapshot.macd, Some(0.0));
    }

    #[test]
    fn out_of_range_index() {
        let bars = make_bars(&[100.0, 101.0]);
        assert!(IndicatorSnapshot::compute(&bars, 2, &IndicatorParams::default()).is_none());
        let frame = IndicatorFrame::compute(&bars, &IndicatorParams::default());
        assert!(frame.snapshot_at(2).is_none());
    }

    #[test]
    fn frame_snapshot_matches_prefix_computation() {
        let bars = make_bars(&wavy(80));
        let params = IndicatorParams::default();
        let frame = IndicatorFrame::compute(&bars, &params);

        for index in [0, 13, 14, 19, 49, 50, 79] {
            let from_frame = frame.snapshot_at(index).unwrap();
            let from_prefix = IndicatorSnapshot::compute(&bars, index, &params).unwrap();
            assert_eq!(from_frame, from_prefix, "mismatch at index {}", index);
        }
    }

    #[test]
    fn snapshot_serializes_undefined_as_null() {
        let json = serde_json::to_value(IndicatorSnapshot::default()).unwrap();
        assert!(json["ma_50"].is_null());
        assert!(json["macd_histogram"].is_null());
    }
}
