//! Bar acquisition port.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::period::Period;

pub trait DataPort {
    /// Bars for `ticker` inside `period`, ascending by date. A ticker with
    /// nothing to return is `SigtraderError::NoData`, never an empty `Ok`.
    fn fetch_bars(&self, ticker: &str, period: &Period) -> Result<Vec<PriceBar>, SigtraderError>;

    fn list_tickers(&self) -> Result<Vec<String>, SigtraderError>;
}
