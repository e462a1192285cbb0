//! Result sink port.

use crate::domain::analyzer::AnalysisResult;
use crate::domain::backtest::BacktestResult;
use crate::domain::error::SigtraderError;
use crate::domain::metrics::RiskReport;

/// Port for publishing results. Each call emits one record.
pub trait ReportPort {
    fn publish_analysis(&mut self, result: &AnalysisResult) -> Result<(), SigtraderError>;

    fn publish_backtest(&mut self, result: &BacktestResult) -> Result<(), SigtraderError>;

    fn publish_risk(&mut self, report: &RiskReport) -> Result<(), SigtraderError>;

    /// Record that `ticker` produced no result.
    fn publish_failure(&mut self, ticker: &str, error: &SigtraderError) -> Result<(), SigtraderError>;
}
