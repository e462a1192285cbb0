//! Core domain types and logic.

pub mod analyzer;
pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod indicator_helpers;
pub mod metrics;
pub mod monte_carlo;
pub mod ohlcv;
pub mod period;
pub mod position;
pub mod signal;
pub mod snapshot;
pub mod universe;
