use std::fmt;

use sim_types::SimExitKind;

/// Config-file and run-parameter errors, detected before any market data is
/// opened (§7's `ConfigError`): unknown fields, an unreadable/unparseable
/// file, an empty strategy list, a duplicate `strategy_id`, or a
/// contradictory run parameter.
#[derive(Debug, Clone)]
pub enum ConfigError {
    Io { path: String, msg: String },
    Parse { path: String, msg: String },
    UnsupportedExtension { path: String, extension: String },
    Empty,
    DuplicateStrategyId(String),
    InvalidRange { field: &'static str, detail: String },
    InvalidValue { field: &'static str, detail: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, msg } => write!(f, "read config {path}: {msg}"),
            ConfigError::Parse { path, msg } => write!(f, "parse config {path}: {msg}"),
            ConfigError::UnsupportedExtension { path, extension } => write!(
                f,
                "unsupported strategy-file extension '{extension}' for {path} (expected .json, .yaml, or .yml)"
            ),
            ConfigError::Empty => write!(f, "strategy config file contains no strategies"),
            ConfigError::DuplicateStrategyId(id) => {
                write!(f, "duplicate strategy_id: {id}")
            }
            ConfigError::InvalidRange { field, detail } => {
                write!(f, "invalid {field}: {detail}")
            }
            ConfigError::InvalidValue { field, detail } => {
                write!(f, "invalid {field}: {detail}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub fn exit_kind(&self) -> SimExitKind {
        SimExitKind::ConfigError
    }
}

/// Non-fatal structural observations surfaced in the run manifest rather
/// than aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// §9's open question: `credit_dividends=true` with
    /// `price_series_mode=as_is` risks double-counting dividends already
    /// baked into an adjusted close series, unless the operator explicitly
    /// overrode the check.
    DividendDoubleCountRisk,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::DividendDoubleCountRisk => write!(
                f,
                "credit_dividends=true with price_series_mode=as_is risks double-counting \
                 dividends already reflected in an adjusted close series; pass \
                 --allow-dividend-double-count if this is intentional"
            ),
        }
    }
}
