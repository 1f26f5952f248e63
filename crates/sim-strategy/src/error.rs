use std::fmt;

use sim_types::SimExitKind;

/// `validate_config` failures: detected at startup, before any data is
/// opened, per §4.4/§7.
#[derive(Debug, Clone)]
pub enum StrategyConfigError {
    UnknownPlugin(String),
    NonPositiveN { strategy_id: String, n: i64 },
    UnknownRankMetric { strategy_id: String },
    MissingSymbols { strategy_id: String },
    ContradictoryOverride { strategy_id: String, detail: String },
}

impl fmt::Display for StrategyConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyConfigError::UnknownPlugin(name) => write!(f, "unknown plugin: {name}"),
            StrategyConfigError::NonPositiveN { strategy_id, n } => {
                write!(f, "{strategy_id}: universe.n must be positive, got {n}")
            }
            StrategyConfigError::UnknownRankMetric { strategy_id } => {
                write!(f, "{strategy_id}: missing or unknown rank metric")
            }
            StrategyConfigError::MissingSymbols { strategy_id } => {
                write!(f, "{strategy_id}: universe.symbols is required for explicit_symbols")
            }
            StrategyConfigError::ContradictoryOverride { strategy_id, detail } => {
                write!(f, "{strategy_id}: contradictory config: {detail}")
            }
        }
    }
}

impl std::error::Error for StrategyConfigError {}

impl StrategyConfigError {
    pub fn exit_kind(&self) -> SimExitKind {
        SimExitKind::ConfigError
    }
}

/// A run-time rebalance failure: the tradable universe was smaller than the
/// requested `N` and the strategy was configured `strict`. Lenient mode
/// never produces this — it allocates to the smaller universe instead and
/// logs a warning.
#[derive(Debug, Clone)]
pub struct RebalanceError {
    pub strategy_id: String,
    pub have: usize,
    pub need: u32,
}

impl fmt::Display for RebalanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: universe too small in strict mode (have {}, need {})",
            self.strategy_id, self.have, self.need
        )
    }
}

impl std::error::Error for RebalanceError {}

impl RebalanceError {
    pub fn exit_kind(&self) -> SimExitKind {
        SimExitKind::RuntimeError
    }
}
