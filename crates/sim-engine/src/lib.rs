//! Rebalance & Contribution Scheduler (C5) + Simulation Engine (C6): drives
//! every configured strategy in lockstep over one read-once market-data
//! stream, in exactly the seven-step daily event order, and assembles the
//! per-strategy `DailyRecord`/`TradeFill` output that C7 consumes.

mod engine;
mod error;
mod run;
mod scheduler;

pub use engine::{run, run_parallel, SimulationOutcome};
pub use error::EngineError;
pub use run::StrategyRun;
pub use scheduler::Scheduler;
