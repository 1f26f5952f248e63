use std::fmt;

use sim_types::SimExitKind;

/// Top-level orchestration error: wraps every crate's own error type so
/// `main` can classify a single value into one of §6's four exit codes
/// without re-deriving the mapping, and report a human-readable message on
/// stderr before exiting.
#[derive(Debug)]
pub enum CliError {
    Config(sim_config::ConfigError),
    Strategy(sim_strategy::StrategyConfigError),
    Data(sim_marketdata::DataError),
    Engine(sim_engine::EngineError),
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "config error: {e}"),
            CliError::Strategy(e) => write!(f, "strategy config error: {e}"),
            CliError::Data(e) => write!(f, "data error: {e}"),
            CliError::Engine(e) => write!(f, "runtime error: {e}"),
            CliError::Output(msg) => write!(f, "output error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn exit_kind(&self) -> SimExitKind {
        match self {
            CliError::Config(e) => e.exit_kind(),
            CliError::Strategy(e) => e.exit_kind(),
            CliError::Data(e) => e.exit_kind(),
            CliError::Engine(e) => e.exit_kind(),
            CliError::Output(_) => SimExitKind::RuntimeError,
        }
    }
}

impl From<sim_config::ConfigError> for CliError {
    fn from(e: sim_config::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<sim_strategy::StrategyConfigError> for CliError {
    fn from(e: sim_strategy::StrategyConfigError) -> Self {
        CliError::Strategy(e)
    }
}

impl From<sim_marketdata::DataError> for CliError {
    fn from(e: sim_marketdata::DataError) -> Self {
        CliError::Data(e)
    }
}

impl From<sim_engine::EngineError> for CliError {
    fn from(e: sim_engine::EngineError) -> Self {
        CliError::Engine(e)
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}
