//! Configuration validation.
//!
//! Checks every configured value before a run. Keys are optional; a key
//! that is present must parse and fall inside its allowed range.

use crate::domain::backtest::{EvaluationMode, MIN_BACKTEST_BARS};
use crate::domain::error::SigtraderError;
use crate::domain::period::Period;
use crate::ports::config_port::ConfigPort;

const WEIGHT_TOLERANCE: f64 = 1e-9;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(period) = config.get_string("data", "period") {
        period.parse::<Period>()?;
    }
    Ok(())
}

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_periods(config)?;
    validate_macd(config)?;
    validate_bollinger(config)?;
    validate_rsi_thresholds(config)?;
    validate_weights(config)?;
    validate_signal_thresholds(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let warmup = integer(config, "backtest", "warmup_bars", MIN_BACKTEST_BARS as i64)?;
    if warmup < MIN_BACKTEST_BARS as i64 {
        return Err(SigtraderError::config_invalid(
            "backtest",
            "warmup_bars",
            format!("warmup_bars must be at least {}", MIN_BACKTEST_BARS),
        ));
    }

    if let Some(mode) = config.get_string("backtest", "mode") {
        if EvaluationMode::parse(&mode).is_none() {
            return Err(SigtraderError::config_invalid(
                "backtest",
                "mode",
                format!("unknown mode '{}' (expected walk_forward or full_window)", mode),
            ));
        }
    }
    Ok(())
}

pub fn validate_statistics_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let rate = number(config, "statistics", "risk_free_rate", 0.02)?;
    if !(0.0..1.0).contains(&rate) {
        return Err(SigtraderError::config_invalid(
            "statistics",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }

    if integer(config, "statistics", "simulations", 1000)? <= 0 {
        return Err(SigtraderError::config_invalid(
            "statistics",
            "simulations",
            "simulations must be positive",
        ));
    }

    if number(config, "statistics", "initial_capital", 1_000_000.0)? <= 0.0 {
        return Err(SigtraderError::config_invalid(
            "statistics",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }

    if let Some(seed) = config.get_string("statistics", "seed") {
        seed.trim().parse::<u64>().map_err(|_| {
            SigtraderError::config_invalid(
                "statistics",
                "seed",
                format!("'{}' is not an unsigned integer", seed),
            )
        })?;
    }
    Ok(())
}

/// Every check above, in the order a run would hit them.
pub fn validate_all(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_data_config(config)?;
    validate_analysis_config(config)?;
    validate_backtest_config(config)?;
    validate_statistics_config(config)?;
    Ok(())
}

fn number(config: &dyn ConfigPort, section: &str, key: &str, default: f64) -> Result<f64, SigtraderError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                SigtraderError::config_invalid(section, key, format!("'{}' is not a number", raw))
            }),
    }
}

fn integer(config: &dyn ConfigPort, section: &str, key: &str, default: i64) -> Result<i64, SigtraderError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
            SigtraderError::config_invalid(section, key, format!("'{}' is not an integer", raw))
        }),
    }
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let periods = [
        ("rsi_period", 14),
        ("macd_fast", 12),
        ("macd_slow", 26),
        ("macd_signal", 9),
        ("bollinger_period", 20),
        ("atr_period", 14),
    ];
    for (key, default) in periods {
        if integer(config, "analysis", key, default)? <= 0 {
            return Err(SigtraderError::config_invalid(
                "analysis",
                key,
                format!("{} must be positive", key),
            ));
        }
    }
    Ok(())
}

fn validate_macd(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let fast = integer(config, "analysis", "macd_fast", 12)?;
    let slow = integer(config, "analysis", "macd_slow", 26)?;
    if fast >= slow {
        return Err(SigtraderError::config_invalid(
            "analysis",
            "macd_fast",
            "macd_fast must be less than macd_slow",
        ));
    }
    Ok(())
}

fn validate_bollinger(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if number(config, "analysis", "bollinger_mult", 2.0)? < 0.0 {
        return Err(SigtraderError::config_invalid(
            "analysis",
            "bollinger_mult",
            "bollinger_mult must be non-negative",
        ));
    }
    Ok(())
}

fn validate_rsi_thresholds(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let oversold = number(config, "analysis", "rsi_oversold", 30.0)?;
    let overbought = number(config, "analysis", "rsi_overbought", 70.0)?;
    if oversold < 0.0 || overbought > 100.0 || oversold >= overbought {
        return Err(SigtraderError::config_invalid(
            "analysis",
            "rsi_oversold",
            "require 0 <= rsi_oversold < rsi_overbought <= 100",
        ));
    }
    Ok(())
}

fn validate_weights(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let mut sum = 0.0;
    for (key, default) in [("weight_ma", 0.4), ("weight_rsi", 0.3), ("weight_macd", 0.3)] {
        let weight = number(config, "analysis", key, default)?;
        if weight < 0.0 {
            return Err(SigtraderError::config_invalid(
                "analysis",
                key,
                format!("{} must be non-negative", key),
            ));
        }
        sum += weight;
    }

    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(SigtraderError::config_invalid(
            "analysis",
            "weight_ma",
            format!("signal weights must sum to 1 (got {})", sum),
        ));
    }
    Ok(())
}

fn validate_signal_thresholds(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let buy = number(config, "analysis", "buy_threshold", 0.3)?;
    let sell = number(config, "analysis", "sell_threshold", -0.3)?;
    if buy <= 0.0 {
        return Err(SigtraderError::config_invalid(
            "analysis",
            "buy_threshold",
            "buy_threshold must be positive",
        ));
    }
    if sell >= 0.0 {
        return Err(SigtraderError::config_invalid(
            "analysis",
            "sell_threshold",
            "sell_threshold must be negative",
        ));
    }
    Ok(())
}
