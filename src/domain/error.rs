//! Domain error types.

/// Top-level error type for sigtrader.
///
/// Core operations never panic on bad market data; every "unavailable"
/// outcome surfaces as one of these variants (or as `None` for scalar
/// statistics).
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("no data available for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error("bar {index} of {ticker} is missing a valid {field} value")]
    MissingField {
        ticker: String,
        index: usize,
        field: &'static str,
    },

    #[error("invalid period '{value}' (expected e.g. 5d, 1wk, 6mo, 1y, ytd, max)")]
    InvalidPeriod { value: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigtraderError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SigtraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl SigtraderError {
    /// Stable process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            SigtraderError::Io(_) | SigtraderError::Json(_) => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::Data { .. } | SigtraderError::MissingField { .. } => 3,
            SigtraderError::NoData { .. } | SigtraderError::InsufficientData { .. } => 5,
            SigtraderError::InvalidPeriod { .. } => 6,
        }
    }
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
