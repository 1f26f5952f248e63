use std::fmt;

use sim_types::SimExitKind;

/// Errors that abort the run for one or all strategies, per §7's taxonomy.
/// `Config` (an invalid `StrategyConfig` discovered while building a
/// `StrategyRun`), `AccountingInvariantViolation`, and `Rebalance` (universe
/// too small, strict mode) are all fatal — they stop the whole run, not
/// just the offending strategy, since any of them is grounds to distrust
/// the run as a whole.
#[derive(Debug, Clone)]
pub enum EngineError {
    Config(sim_strategy::StrategyConfigError),
    Portfolio(sim_portfolio::PortfolioError),
    Rebalance(sim_strategy::RebalanceError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Config(e) => write!(f, "{e}"),
            EngineError::Portfolio(e) => write!(f, "{e}"),
            EngineError::Rebalance(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<sim_strategy::StrategyConfigError> for EngineError {
    fn from(e: sim_strategy::StrategyConfigError) -> Self {
        EngineError::Config(e)
    }
}

impl From<sim_portfolio::PortfolioError> for EngineError {
    fn from(e: sim_portfolio::PortfolioError) -> Self {
        EngineError::Portfolio(e)
    }
}

impl From<sim_strategy::RebalanceError> for EngineError {
    fn from(e: sim_strategy::RebalanceError) -> Self {
        EngineError::Rebalance(e)
    }
}

impl EngineError {
    pub fn exit_kind(&self) -> SimExitKind {
        match self {
            EngineError::Config(e) => e.exit_kind(),
            EngineError::Portfolio(e) => e.exit_kind(),
            EngineError::Rebalance(e) => e.exit_kind(),
        }
    }
}
