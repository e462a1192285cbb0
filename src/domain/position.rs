//! Single-position state machine driven by composite signals.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Position {
    #[default]
    Flat,
    Long {
        entry_price: f64,
        entry_date: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub profit: f64,
    pub profit_percent: f64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.profit > 0.0
    }
}

impl Position {
    pub fn is_long(&self) -> bool {
        matches!(self, Position::Long { .. })
    }

    /// Apply one signal at `bar`'s close. Returns the next state and the
    /// trade closed by this transition, if any.
    pub fn on_signal(self, signal: Signal, bar: &PriceBar) -> (Position, Option<Trade>) {
        match (self, signal) {
            (Position::Flat, Signal::Buy) => (
                Position::Long {
                    entry_price: bar.close,
                    entry_date: bar.date,
                },
                None,
            ),
            (
                Position::Long {
                    entry_price,
                    entry_date,
                },
                Signal::Sell,
            ) => {
                let profit = bar.close - entry_price;
                let profit_percent = if entry_price != 0.0 {
                    profit / entry_price * 100.0
                } else {
                    0.0
                };
                let trade = Trade {
                    entry_date,
                    exit_date: bar.date,
                    entry_price,
                    exit_price: bar.close,
                    profit,
                    profit_percent,
                };
                (Position::Flat, Some(trade))
            }
            (state, Signal::Buy | Signal::Sell | Signal::Hold | Signal::Neutral) => (state, None),
        }
    }
}
