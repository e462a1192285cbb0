//! CSV file data adapter.
//!
//! One file per ticker at `<dir>/<TICKER>.csv` with a header row naming
//! `date, open, high, low, close, volume` in any order and case. Extra
//! columns are ignored.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::period::Period;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

/// Position of each required column in the header.
struct ColumnMap([usize; 6]);

impl ColumnMap {
    fn from_headers(headers: &StringRecord, ticker: &str) -> Result<Self, SigtraderError> {
        let mut positions = [0usize; 6];
        for (slot, name) in positions.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| SigtraderError::Data {
                    reason: format!("{}: missing '{}' column", ticker, name),
                })?;
        }
        Ok(Self(positions))
    }

    fn get<'r>(&self, record: &'r StringRecord, column: usize) -> &'r str {
        record.get(self.0[column]).unwrap_or("").trim()
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn parse_record(
        ticker: &str,
        index: usize,
        record: &StringRecord,
        columns: &ColumnMap,
    ) -> Result<PriceBar, SigtraderError> {
        let missing = |field: &'static str| SigtraderError::MissingField {
            ticker: ticker.to_string(),
            index,
            field,
        };

        let date_str = columns.get(record, 0);
        if date_str.is_empty() {
            return Err(missing("date"));
        }
        // accept timestamps such as "2024-01-15 00:00:00+09:00"
        let date = NaiveDate::parse_from_str(date_str.get(..10).unwrap_or(date_str), "%Y-%m-%d")
            .map_err(|e| SigtraderError::Data {
                reason: format!("{}: invalid date '{}' on row {}: {}", ticker, date_str, index, e),
            })?;

        let mut prices = [0.0_f64; 4];
        for (offset, price) in prices.iter_mut().enumerate() {
            let column = offset + 1;
            let raw = columns.get(record, column);
            if raw.is_empty() {
                return Err(missing(COLUMNS[column]));
            }
            *price = raw.parse().map_err(|e| SigtraderError::Data {
                reason: format!(
                    "{}: invalid {} value '{}' on row {}: {}",
                    ticker, COLUMNS[column], raw, index, e
                ),
            })?;
        }

        let raw_volume = columns.get(record, 5);
        if raw_volume.is_empty() {
            return Err(missing("volume"));
        }
        let volume = raw_volume
            .parse::<i64>()
            .or_else(|_| raw_volume.parse::<f64>().map(|v| v.round() as i64))
            .map_err(|e| SigtraderError::Data {
                reason: format!(
                    "{}: invalid volume value '{}' on row {}: {}",
                    ticker, raw_volume, index, e
                ),
            })?;

        let [open, high, low, close] = prices;
        Ok(PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, ticker: &str, period: &Period) -> Result<Vec<PriceBar>, SigtraderError> {
        let path = self.csv_path(ticker);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SigtraderError::NoData {
                    ticker: ticker.to_string(),
                });
            }
            Err(e) => {
                return Err(SigtraderError::Data {
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| SigtraderError::Data {
            reason: format!("{}: CSV header error: {}", ticker, e),
        })?;
        let columns = ColumnMap::from_headers(headers, ticker)?;

        let mut bars = Vec::new();
        for (index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SigtraderError::Data {
                reason: format!("{}: CSV parse error: {}", ticker, e),
            })?;
            bars.push(Self::parse_record(ticker, index, &record, &columns)?);
        }

        bars.sort_by_key(|b| b.date);
        if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(SigtraderError::Data {
                reason: format!("{}: duplicate date {}", ticker, pair[0].date),
            });
        }

        let total = bars.len();
        let window = period.apply(&bars).to_vec();
        debug!(ticker, %period, total, selected = window.len(), "loaded bars");

        if window.is_empty() {
            return Err(SigtraderError::NoData {
                ticker: ticker.to_string(),
            });
        }
        Ok(window)
    }

    fn list_tickers(&self) -> Result<Vec<String>, SigtraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SigtraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SigtraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if let (true, Some(stem)) = (is_csv, path.file_stem()) {
                tickers.push(stem.to_string_lossy().into_owned());
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}
