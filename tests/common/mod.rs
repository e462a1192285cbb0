#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use sigtrader::domain::error::SigtraderError;
pub use sigtrader::domain::ohlcv::PriceBar;
use sigtrader::domain::period::Period;
use sigtrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, ticker: &str, period: &Period) -> Result<Vec<PriceBar>, SigtraderError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SigtraderError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(bars) if !bars.is_empty() => Ok(period.apply(bars).to_vec()),
            _ => Err(SigtraderError::NoData {
                ticker: ticker.to_string(),
            }),
        }
    }

    fn list_tickers(&self) -> Result<Vec<String>, SigtraderError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn make_bar(date: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// Daily bars from 2023-01-02 with the given closes.
pub fn generate_bars(closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10_000 + (i as i64 % 7) * 500,
        })
        .collect()
}

pub fn rising_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

/// 60 rising bars (100..159) followed by 40 bars falling 3 per day.
pub fn rise_then_fall_closes() -> Vec<f64> {
    let mut closes = rising_closes(60);
    closes.extend((1..=40).map(|i| 159.0 - 3.0 * i as f64));
    closes
}

/// Deterministic oscillating series with drift.
pub fn wavy_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.35).sin() * 8.0 + i as f64 * 0.05)
        .collect()
}
