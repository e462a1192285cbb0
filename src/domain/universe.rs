//! Ticker lists and multi-ticker analysis.
//!
//! Each ticker is fetched and analyzed on its own; a failure is recorded
//! against that ticker and never stops the others.

use crate::domain::analyzer::{analyze, AnalysisResult, AnalyzerConfig};
use crate::domain::error::SigtraderError;
use crate::domain::period::Period;
use crate::ports::data_port::DataPort;
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

/// Parse a comma-separated ticker list, uppercased, in input order.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

#[derive(Debug)]
pub struct TickerOutcome {
    pub ticker: String,
    pub result: Result<AnalysisResult, SigtraderError>,
}

impl TickerOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub fn analyze_universe(
    data_port: &dyn DataPort,
    tickers: &[String],
    period: &Period,
    config: &AnalyzerConfig,
) -> Vec<TickerOutcome> {
    let outcomes: Vec<TickerOutcome> = tickers
        .iter()
        .map(|ticker| {
            let result = data_port
                .fetch_bars(ticker, period)
                .and_then(|bars| analyze(ticker, &bars, config));
            if let Err(e) = &result {
                warn!(ticker = ticker.as_str(), error = %e, "analysis unavailable");
            }
            TickerOutcome {
                ticker: ticker.clone(),
                result,
            }
        })
        .collect();

    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    info!(succeeded, total = outcomes.len(), %period, "universe analyzed");
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tickers_basic() {
        let result = parse_tickers("7203,6758,AAPL").unwrap();
        assert_eq!(result, vec!["7203", "6758", "AAPL"]);
    }

    #[test]
    fn parse_tickers_trims_and_uppercases() {
        let result = parse_tickers("  7203.t , msft ,aapl").unwrap();
        assert_eq!(result, vec!["7203.T", "MSFT", "AAPL"]);
    }

    #[test]
    fn parse_tickers_single() {
        assert_eq!(parse_tickers("9984").unwrap(), vec!["9984"]);
    }

    #[test]
    fn parse_tickers_empty_token() {
        assert_eq!(parse_tickers("7203,,6758"), Err(UniverseError::EmptyToken));
        assert_eq!(parse_tickers(""), Err(UniverseError::EmptyToken));
    }

    #[test]
    fn parse_tickers_duplicate() {
        let result = parse_tickers("AAPL,MSFT,aapl");
        assert!(matches!(result, Err(UniverseError::DuplicateTicker(s)) if s == "AAPL"));
    }
}
