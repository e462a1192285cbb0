//! JSON-lines report adapter implementing ReportPort.
//!
//! Writes one JSON object per line to any writer (stdout, a file, a buffer).

use std::io::Write;

use serde::Serialize;

use crate::domain::analyzer::AnalysisResult;
use crate::domain::backtest::BacktestResult;
use crate::domain::error::SigtraderError;
use crate::domain::metrics::RiskReport;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct FailureRecord<'a> {
    ticker: &'a str,
    error: String,
}

pub struct JsonReportAdapter<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonReportAdapter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    /// Indented output; records are separated by a newline.
    pub fn pretty(writer: W) -> Self {
        Self {
            writer,
            pretty: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record<T: Serialize>(&mut self, record: &T) -> Result<(), SigtraderError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, record)?;
        } else {
            serde_json::to_writer(&mut self.writer, record)?;
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> ReportPort for JsonReportAdapter<W> {
    fn publish_analysis(&mut self, result: &AnalysisResult) -> Result<(), SigtraderError> {
        self.write_record(result)
    }

    fn publish_backtest(&mut self, result: &BacktestResult) -> Result<(), SigtraderError> {
        self.write_record(result)
    }

    fn publish_risk(&mut self, report: &RiskReport) -> Result<(), SigtraderError> {
        self.write_record(report)
    }

    fn publish_failure(&mut self, ticker: &str, error: &SigtraderError) -> Result<(), SigtraderError> {
        self.write_record(&FailureRecord {
            ticker,
            error: error.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::Position;

    fn lines(buffer: Vec<u8>) -> Vec<serde_json::Value> {
        String::from_utf8(buffer)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn writes_one_line_per_record() {
        let mut adapter = JsonReportAdapter::new(Vec::new());
        let report = RiskReport {
            ticker: "7203".to_string(),
            sharpe_ratio: None,
            max_drawdown: Some(-12.5),
            monte_carlo: None,
        };
        adapter.publish_risk(&report).unwrap();
        adapter
            .publish_failure("9999", &SigtraderError::NoData { ticker: "9999".into() })
            .unwrap();

        let records = lines(adapter.into_inner());
        assert_eq!(records.len(), 2);
        assert!(records[0]["sharpe_ratio"].is_null());
        assert_eq!(records[0]["max_drawdown"], -12.5);
        assert_eq!(records[1]["ticker"], "9999");
        assert_eq!(records[1]["error"], "no data available for 9999");
    }

    #[test]
    fn backtest_record_shape() {
        let mut adapter = JsonReportAdapter::new(Vec::new());
        let result = BacktestResult {
            ticker: "7203".to_string(),
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate: 0.0,
            total_return: 0.0,
            max_drawdown: -3.0,
            trades: Vec::new(),
            open_position: Position::Flat,
        };
        adapter.publish_backtest(&result).unwrap();

        let records = lines(adapter.into_inner());
        assert_eq!(records[0]["winning_rate"], 0.0);
        assert_eq!(records[0]["trades"], serde_json::json!([]));
    }

    #[test]
    fn pretty_output_is_valid_json() {
        let mut adapter = JsonReportAdapter::pretty(Vec::new());
        adapter
            .publish_failure("X", &SigtraderError::InvalidPeriod { value: "3h".into() })
            .unwrap();

        let text = String::from_utf8(adapter.into_inner()).unwrap();
        assert!(text.contains("\n  \"ticker\""));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["ticker"], "X");
    }
}
