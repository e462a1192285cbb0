//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::analyzer::{validate_bars, AnalyzerConfig};
use crate::domain::backtest::{run_backtest, BacktestConfig, EvaluationMode};
use crate::domain::config_validation::validate_all;
use crate::domain::error::SigtraderError;
use crate::domain::indicator_helpers::{compute_indicator_columns, full_indicator_set};
use crate::domain::metrics::{risk_report, StatisticsConfig};
use crate::domain::ohlcv::PriceBar;
use crate::domain::period::Period;
use crate::domain::signal::{RsiThresholds, SignalWeights};
use crate::domain::snapshot::IndicatorParams;
use crate::domain::universe::{analyze_universe, parse_tickers};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Technical signal analysis and backtesting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// INI configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory holding <TICKER>.csv files (overrides [data] dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Lookback window, e.g. 6mo, 1y, ytd, max (overrides [data] period)
    #[arg(short, long)]
    pub period: Option<String>,
    /// Write results here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Indent JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Composite signal for the latest bar of each ticker
    Analyze {
        #[arg(required = true)]
        tickers: Vec<String>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Replay history against the signal rule
    Backtest {
        #[arg(required = true)]
        tickers: Vec<String>,
        /// walk_forward or full_window (overrides [backtest] mode)
        #[arg(long)]
        mode: Option<String>,
        /// First date of an explicit range, YYYY-MM-DD (replaces --period)
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,
        /// Date the range stops before, YYYY-MM-DD
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Sharpe ratio, maximum drawdown and Monte Carlo summary
    Stats {
        #[arg(required = true)]
        tickers: Vec<String>,
        #[arg(long)]
        simulations: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Every indicator series for one ticker as CSV
    Indicators {
        ticker: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Tickers available in the data directory
    List {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Check a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Per-ticker tally of a multi-ticker run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Exit status of the first failure.
    pub failure_status: Option<u8>,
}

impl PipelineSummary {
    fn record_failure(&mut self, err: &SigtraderError) {
        self.failed += 1;
        self.failure_status.get_or_insert(err.exit_status());
    }

    /// Non-zero only when every ticker failed.
    pub fn exit_code(&self) -> ExitCode {
        match (self.succeeded, self.failure_status) {
            (0, Some(status)) => ExitCode::from(status),
            _ => ExitCode::SUCCESS,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Analyze { tickers, common } => run_analyze(&tickers, &common),
        Command::Backtest {
            tickers,
            mode,
            start,
            end,
            common,
        } => run_backtest_command(&tickers, mode.as_deref(), start.zip(end), &common),
        Command::Stats {
            tickers,
            simulations,
            seed,
            common,
        } => run_stats(&tickers, simulations, seed, &common),
        Command::Indicators { ticker, common } => {
            run_indicators(&ticker, &common).map(|()| ExitCode::SUCCESS)
        }
        Command::List { config, data_dir } => {
            run_list(config.as_deref(), data_dir).map(|()| ExitCode::SUCCESS)
        }
        Command::Validate { config } => run_validate(&config).map(|()| ExitCode::SUCCESS),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, SigtraderError> {
    let adapter = match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path)?
        }
        None => FileConfigAdapter::empty(),
    };
    validate_all(&adapter)?;
    Ok(adapter)
}

pub fn build_analyzer_config(config: &dyn ConfigPort) -> AnalyzerConfig {
    let defaults = AnalyzerConfig::default();
    let period = |key: &str, default: usize| {
        config.get_int("analysis", key, default as i64).max(1) as usize
    };

    AnalyzerConfig {
        indicators: IndicatorParams {
            rsi_period: period("rsi_period", defaults.indicators.rsi_period),
            macd_fast: period("macd_fast", defaults.indicators.macd_fast),
            macd_slow: period("macd_slow", defaults.indicators.macd_slow),
            macd_signal: period("macd_signal", defaults.indicators.macd_signal),
            bollinger_period: period("bollinger_period", defaults.indicators.bollinger_period),
            bollinger_mult: config.get_double(
                "analysis",
                "bollinger_mult",
                defaults.indicators.bollinger_mult,
            ),
            atr_period: period("atr_period", defaults.indicators.atr_period),
        },
        rsi_thresholds: RsiThresholds {
            oversold: config.get_double("analysis", "rsi_oversold", defaults.rsi_thresholds.oversold),
            overbought: config.get_double(
                "analysis",
                "rsi_overbought",
                defaults.rsi_thresholds.overbought,
            ),
        },
        weights: SignalWeights {
            ma: config.get_double("analysis", "weight_ma", defaults.weights.ma),
            rsi: config.get_double("analysis", "weight_rsi", defaults.weights.rsi),
            macd: config.get_double("analysis", "weight_macd", defaults.weights.macd),
        },
        buy_threshold: config.get_double("analysis", "buy_threshold", defaults.buy_threshold),
        sell_threshold: config.get_double("analysis", "sell_threshold", defaults.sell_threshold),
    }
}

pub fn build_backtest_config(
    config: &dyn ConfigPort,
    mode_override: Option<&str>,
) -> Result<BacktestConfig, SigtraderError> {
    let defaults = BacktestConfig::default();
    let mode = match mode_override.map(str::to_string).or_else(|| config.get_string("backtest", "mode")) {
        Some(raw) => EvaluationMode::parse(&raw).ok_or_else(|| {
            SigtraderError::config_invalid(
                "backtest",
                "mode",
                format!("unknown mode '{}' (expected walk_forward or full_window)", raw),
            )
        })?,
        None => defaults.mode,
    };

    Ok(BacktestConfig {
        warmup_bars: config
            .get_int("backtest", "warmup_bars", defaults.warmup_bars as i64)
            .max(0) as usize,
        mode,
    })
}

pub fn build_statistics_config(
    config: &dyn ConfigPort,
    simulations: Option<usize>,
    seed: Option<u64>,
) -> StatisticsConfig {
    let defaults = StatisticsConfig::default();
    StatisticsConfig {
        risk_free_rate: config.get_double("statistics", "risk_free_rate", defaults.risk_free_rate),
        simulations: simulations.unwrap_or_else(|| {
            config
                .get_int("statistics", "simulations", defaults.simulations as i64)
                .max(0) as usize
        }),
        initial_capital: config.get_double(
            "statistics",
            "initial_capital",
            defaults.initial_capital,
        ),
        seed: seed.or_else(|| {
            config
                .get_string("statistics", "seed")
                .and_then(|s| s.trim().parse().ok())
        }),
    }
}

/// CLI value first, then `[data] period`, then one year.
pub fn resolve_period(cli_value: Option<&str>, config: &dyn ConfigPort) -> Result<Period, SigtraderError> {
    match cli_value.map(str::to_string).or_else(|| config.get_string("data", "period")) {
        Some(raw) => raw.parse(),
        None => Ok(Period::default()),
    }
}

/// An explicit `start..end` range replaces the resolved period.
pub fn resolve_backtest_period(
    range: Option<(NaiveDate, NaiveDate)>,
    fallback: Period,
) -> Result<Period, SigtraderError> {
    match range {
        Some((start, end)) => Period::range(start, end),
        None => Ok(fallback),
    }
}

pub fn resolve_data_dir(cli_value: Option<PathBuf>, config: &dyn ConfigPort) -> PathBuf {
    cli_value
        .or_else(|| config.get_string("data", "dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn resolve_tickers(args: &[String]) -> Result<Vec<String>, SigtraderError> {
    parse_tickers(&args.join(",")).map_err(|e| SigtraderError::Data {
        reason: e.to_string(),
    })
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, SigtraderError> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}

fn open_report(common: &CommonArgs) -> Result<JsonReportAdapter<Box<dyn Write>>, SigtraderError> {
    let writer = open_output(common.output.as_deref())?;
    Ok(if common.pretty {
        JsonReportAdapter::pretty(writer)
    } else {
        JsonReportAdapter::new(writer)
    })
}

struct Session {
    config: FileConfigAdapter,
    data: CsvAdapter,
    period: Period,
}

impl Session {
    fn open(common: &CommonArgs) -> Result<Self, SigtraderError> {
        let config = load_config(common.config.as_deref())?;
        let period = resolve_period(common.period.as_deref(), &config)?;
        let data_dir = resolve_data_dir(common.data_dir.clone(), &config);
        info!(data_dir = %data_dir.display(), %period, "session ready");
        Ok(Self {
            data: CsvAdapter::new(data_dir),
            config,
            period,
        })
    }
}

fn run_analyze(tickers: &[String], common: &CommonArgs) -> Result<ExitCode, SigtraderError> {
    let tickers = resolve_tickers(tickers)?;
    let session = Session::open(common)?;
    let analyzer = build_analyzer_config(&session.config);
    let mut report = open_report(common)?;

    let summary = run_analyze_pipeline(&session.data, &mut report, &tickers, &session.period, &analyzer)?;
    Ok(summary.exit_code())
}

fn run_backtest_command(
    tickers: &[String],
    mode: Option<&str>,
    range: Option<(NaiveDate, NaiveDate)>,
    common: &CommonArgs,
) -> Result<ExitCode, SigtraderError> {
    let tickers = resolve_tickers(tickers)?;
    let session = Session::open(common)?;
    let period = resolve_backtest_period(range, session.period)?;
    let analyzer = build_analyzer_config(&session.config);
    let backtest = build_backtest_config(&session.config, mode)?;
    let mut report = open_report(common)?;

    let summary = run_backtest_pipeline(
        &session.data,
        &mut report,
        &tickers,
        &period,
        &backtest,
        &analyzer,
    )?;
    Ok(summary.exit_code())
}

fn run_stats(
    tickers: &[String],
    simulations: Option<usize>,
    seed: Option<u64>,
    common: &CommonArgs,
) -> Result<ExitCode, SigtraderError> {
    let tickers = resolve_tickers(tickers)?;
    let session = Session::open(common)?;
    let statistics = build_statistics_config(&session.config, simulations, seed);
    let mut report = open_report(common)?;

    let summary = run_stats_pipeline(&session.data, &mut report, &tickers, &session.period, &statistics)?;
    Ok(summary.exit_code())
}

fn run_indicators(ticker: &str, common: &CommonArgs) -> Result<(), SigtraderError> {
    let session = Session::open(common)?;
    let params = build_analyzer_config(&session.config).indicators;
    let ticker = ticker.trim().to_uppercase();

    let bars = session.data.fetch_bars(&ticker, &session.period)?;
    validate_bars(&ticker, &bars)?;
    let mut out = open_output(common.output.as_deref())?;
    write_indicator_csv(&bars, &params, &mut out)
}

fn run_list(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<(), SigtraderError> {
    let config = load_config(config_path)?;
    let data = CsvAdapter::new(resolve_data_dir(data_dir, &config));
    let tickers = data.list_tickers()?;

    if tickers.is_empty() {
        warn!("no tickers found");
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for ticker in &tickers {
        writeln!(out, "{}", ticker)?;
    }
    info!(count = tickers.len(), "tickers listed");
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), SigtraderError> {
    let config = load_config(Some(config_path))?;
    let analyzer = build_analyzer_config(&config);
    let backtest = build_backtest_config(&config, None)?;
    let statistics = build_statistics_config(&config, None, None);
    let period = resolve_period(None, &config)?;

    info!(
        period = %period,
        rsi_period = analyzer.indicators.rsi_period,
        buy_threshold = analyzer.buy_threshold,
        sell_threshold = analyzer.sell_threshold,
        mode = backtest.mode.as_str(),
        warmup_bars = backtest.warmup_bars,
        simulations = statistics.simulations,
        "configuration is valid"
    );
    Ok(())
}

pub fn run_analyze_pipeline(
    data_port: &dyn DataPort,
    report: &mut dyn ReportPort,
    tickers: &[String],
    period: &Period,
    config: &AnalyzerConfig,
) -> Result<PipelineSummary, SigtraderError> {
    let mut summary = PipelineSummary::default();
    for outcome in analyze_universe(data_port, tickers, period, config) {
        match outcome.result {
            Ok(result) => {
                report.publish_analysis(&result)?;
                summary.succeeded += 1;
            }
            Err(e) => {
                report.publish_failure(&outcome.ticker, &e)?;
                summary.record_failure(&e);
            }
        }
    }
    Ok(summary)
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report: &mut dyn ReportPort,
    tickers: &[String],
    period: &Period,
    backtest: &BacktestConfig,
    analyzer: &AnalyzerConfig,
) -> Result<PipelineSummary, SigtraderError> {
    let mut summary = PipelineSummary::default();
    for ticker in tickers {
        let result = data_port
            .fetch_bars(ticker, period)
            .and_then(|bars| run_backtest(ticker, &bars, backtest, analyzer));
        match result {
            Ok(result) => {
                report.publish_backtest(&result)?;
                summary.succeeded += 1;
            }
            Err(e) => {
                warn!(ticker = ticker.as_str(), error = %e, "backtest unavailable");
                report.publish_failure(ticker, &e)?;
                summary.record_failure(&e);
            }
        }
    }
    Ok(summary)
}

pub fn run_stats_pipeline(
    data_port: &dyn DataPort,
    report: &mut dyn ReportPort,
    tickers: &[String],
    period: &Period,
    statistics: &StatisticsConfig,
) -> Result<PipelineSummary, SigtraderError> {
    let mut summary = PipelineSummary::default();
    for ticker in tickers {
        let bars = data_port.fetch_bars(ticker, period).and_then(|bars| {
            validate_bars(ticker, &bars)?;
            Ok(bars)
        });
        match bars {
            Ok(bars) => {
                report.publish_risk(&risk_report(ticker, &bars, statistics))?;
                summary.succeeded += 1;
            }
            Err(e) => {
                warn!(ticker = ticker.as_str(), error = %e, "statistics unavailable");
                report.publish_failure(ticker, &e)?;
                summary.record_failure(&e);
            }
        }
    }
    Ok(summary)
}

/// One row per bar: date, close, then every indicator column. Undefined
/// values are written as empty cells.
pub fn write_indicator_csv<W: Write>(
    bars: &[PriceBar],
    params: &IndicatorParams,
    writer: W,
) -> Result<(), SigtraderError> {
    let columns = compute_indicator_columns(bars, &full_indicator_set(params));
    let csv_error = |e: csv::Error| SigtraderError::Data {
        reason: format!("CSV write error: {}", e),
    };

    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["date".to_string(), "close".to_string()];
    header.extend(columns.iter().map(|c| c.name.clone()));
    wtr.write_record(&header).map_err(csv_error)?;

    for (index, bar) in bars.iter().enumerate() {
        let mut row = vec![bar.date.to_string(), bar.close.to_string()];
        row.extend(
            columns
                .iter()
                .map(|c| c.values[index].map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&row).map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}
