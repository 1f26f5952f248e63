//! Shared value vocabulary for the simulator workspace.
//!
//! Every other crate depends on this one instead of redefining the data
//! model in §3 locally. No logic lives here beyond small constructors and
//! invariant checks that are cheap enough to run at construction time.

mod config;
mod exit;
mod fill;
mod market;
mod micros;
mod record;

pub use config::{
    ContributionFrequency, ContributionOverride, ExecutionOverride, PriceSeriesMode,
    RankMetric, RebalanceFrequency, RebalanceSpec, SimulationConfig, StrategyConfig,
    UniverseSpec, WeightModel,
};
pub use exit::SimExitKind;
pub use fill::{Side, TradeFill};
pub use market::{MarketBar, MarketSnapshot, TargetAllocation};
pub use micros::{micros_to_f64, round_to_micros, MICROS_SCALE};
pub use record::DailyRecord;
