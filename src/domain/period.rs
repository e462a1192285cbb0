//! Lookback windows named by period strings such as `"6mo"` or `"1y"`.
//!
//! Relative windows are measured back from the last bar's date, so applying
//! a period to the same bars always selects the same slice. A `Range` is a
//! fixed calendar window `[start, end)`, written `2024-01-01..2024-07-01`.

use chrono::{Datelike, Duration, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
    YearToDate,
    Max,
    Range { start: NaiveDate, end: NaiveDate },
}

const DATE_FORMAT: &str = "%Y-%m-%d";

impl Default for Period {
    fn default() -> Self {
        Period::Years(1)
    }
}

impl FromStr for Period {
    type Err = SigtraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        let invalid = || SigtraderError::InvalidPeriod {
            value: s.to_string(),
        };

        if let Some((start, end)) = value.split_once("..") {
            let parse = |d: &str| {
                NaiveDate::parse_from_str(d.trim(), DATE_FORMAT).map_err(|_| invalid())
            };
            return Period::range(parse(start)?, parse(end)?);
        }

        match value.as_str() {
            "ytd" => return Ok(Period::YearToDate),
            "max" => return Ok(Period::Max),
            _ => {}
        }

        let split = value
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (count, unit) = value.split_at(split);
        let count: u32 = count.parse().map_err(|_| invalid())?;
        if count == 0 {
            return Err(invalid());
        }

        match unit {
            "d" => Ok(Period::Days(count)),
            "wk" => Ok(Period::Weeks(count)),
            "mo" => Ok(Period::Months(count)),
            "y" => Ok(Period::Years(count)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Days(n) => write!(f, "{}d", n),
            Period::Weeks(n) => write!(f, "{}wk", n),
            Period::Months(n) => write!(f, "{}mo", n),
            Period::Years(n) => write!(f, "{}y", n),
            Period::YearToDate => f.write_str("ytd"),
            Period::Max => f.write_str("max"),
            Period::Range { start, end } => write!(
                f,
                "{}..{}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
        }
    }
}

impl Period {
    /// Bars dated on or after `start` and strictly before `end`.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, SigtraderError> {
        if start >= end {
            return Err(SigtraderError::InvalidPeriod {
                value: format!("{}..{}", start.format(DATE_FORMAT), end.format(DATE_FORMAT)),
            });
        }
        Ok(Period::Range { start, end })
    }

    /// First date inside the window ending at `last`; `None` for `Max`.
    pub fn start_date(&self, last: NaiveDate) -> Option<NaiveDate> {
        let after = |boundary: Option<NaiveDate>| {
            boundary.and_then(|d| d.checked_add_signed(Duration::days(1)))
        };

        match *self {
            Period::Days(n) => after(last.checked_sub_signed(Duration::days(i64::from(n)))),
            Period::Weeks(n) => after(last.checked_sub_signed(Duration::weeks(i64::from(n)))),
            Period::Months(n) => after(last.checked_sub_months(Months::new(n))),
            Period::Years(n) => after(
                n.checked_mul(12)
                    .and_then(|months| last.checked_sub_months(Months::new(months))),
            ),
            Period::YearToDate => NaiveDate::from_ymd_opt(last.year(), 1, 1),
            Period::Max => None,
            Period::Range { start, .. } => Some(start),
        }
    }

    /// The trailing bars that fall inside this window. Bars must be in
    /// ascending date order.
    pub fn apply<'a>(&self, bars: &'a [PriceBar]) -> &'a [PriceBar] {
        if let Period::Range { start, end } = *self {
            let first = bars.partition_point(|bar| bar.date < start);
            let past_end = bars.partition_point(|bar| bar.date < end);
            return &bars[first..past_end.max(first)];
        }

        let Some(last) = bars.last() else {
            return bars;
        };
        match self.start_date(last.date) {
            Some(start) => {
                let first = bars.partition_point(|bar| bar.date < start);
                &bars[first..]
            }
            None => bars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_bars(start: NaiveDate, days: i64) -> Vec<PriceBar> {
        (0..days)
            .map(|i| PriceBar {
                date: start + Duration::days(i),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: 0,
            })
            .collect()
    }

    #[test]
    fn parse_known_periods() {
        assert_eq!("5d".parse::<Period>().unwrap(), Period::Days(5));
        assert_eq!("1wk".parse::<Period>().unwrap(), Period::Weeks(1));
        assert_eq!("6mo".parse::<Period>().unwrap(), Period::Months(6));
        assert_eq!(" 1Y ".parse::<Period>().unwrap(), Period::Years(1));
        assert_eq!("ytd".parse::<Period>().unwrap(), Period::YearToDate);
        assert_eq!("MAX".parse::<Period>().unwrap(), Period::Max);
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "y", "0d", "3h", "1.5y", "-1y", "10"] {
            let err = bad.parse::<Period>().unwrap_err();
            assert!(
                matches!(err, SigtraderError::InvalidPeriod { .. }),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn display_round_trips() {
        for text in ["5d", "2wk", "3mo", "10y", "ytd", "max"] {
            assert_eq!(text.parse::<Period>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn start_dates() {
        let last = date(2024, 3, 31);
        assert_eq!(Period::Days(5).start_date(last), Some(date(2024, 3, 27)));
        assert_eq!(Period::Weeks(1).start_date(last), Some(date(2024, 3, 25)));
        // clamps to the end of February
        assert_eq!(Period::Months(1).start_date(last), Some(date(2024, 3, 1)));
        assert_eq!(Period::Years(1).start_date(last), Some(date(2023, 4, 1)));
        assert_eq!(Period::YearToDate.start_date(last), Some(date(2024, 1, 1)));
        assert_eq!(Period::Max.start_date(last), None);
    }

    #[test]
    fn apply_keeps_trailing_window() {
        let bars = daily_bars(date(2024, 1, 1), 100);
        let window = Period::Days(10).apply(&bars);

        assert_eq!(window.len(), 10);
        assert_eq!(window[0].date, bars[90].date);
        assert_eq!(window.last(), bars.last());
    }

    #[test]
    fn apply_ytd_and_max() {
        let bars = daily_bars(date(2023, 12, 1), 62);
        let ytd = Period::YearToDate.apply(&bars);
        assert_eq!(ytd[0].date, date(2024, 1, 1));
        assert_eq!(ytd.len(), 31);

        assert_eq!(Period::Max.apply(&bars).len(), 62);
        assert!(Period::Years(1).apply(&[]).is_empty());
    }

    #[test]
    fn parse_date_range() {
        let period = "2024-01-15..2024-03-01".parse::<Period>().unwrap();
        assert_eq!(
            period,
            Period::Range {
                start: date(2024, 1, 15),
                end: date(2024, 3, 1)
            }
        );
        assert_eq!(period.to_string(), "2024-01-15..2024-03-01");

        for bad in [
            "2024-03-01..2024-01-15",
            "2024-01-01..2024-01-01",
            "2024-13-01..2024-12-31",
            "2024-01-01..",
        ] {
            assert!(
                matches!(bad.parse::<Period>(), Err(SigtraderError::InvalidPeriod { .. })),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn range_selects_half_open_window() {
        let bars = daily_bars(date(2024, 1, 1), 100);
        let period = Period::range(date(2024, 2, 1), date(2024, 2, 11)).unwrap();
        let window = period.apply(&bars);

        assert_eq!(window.len(), 10);
        assert_eq!(window[0].date, date(2024, 2, 1));
        assert_eq!(window.last().unwrap().date, date(2024, 2, 10));
        assert_eq!(period.start_date(date(2024, 4, 9)), Some(date(2024, 2, 1)));
    }

    #[test]
    fn range_outside_bars_is_empty() {
        let bars = daily_bars(date(2024, 1, 1), 30);
        let before = Period::range(date(2023, 1, 1), date(2023, 6, 1)).unwrap();
        let after = Period::range(date(2025, 1, 1), date(2025, 6, 1)).unwrap();

        assert!(before.apply(&bars).is_empty());
        assert!(after.apply(&bars).is_empty());
    }
}
