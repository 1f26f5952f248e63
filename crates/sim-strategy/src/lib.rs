//! Strategy Plugins (C4): pure functions from `(date, snapshot, rng) ->
//! TargetAllocation`, dispatched through a closed tagged enum rather than
//! the open `Box<dyn Strategy>` registry this is grounded on, per Design
//! Notes §9 — this simulator has a known-closed, auditable plugin set.

mod error;
mod plugin;
mod rng;

pub use error::{RebalanceError, StrategyConfigError};
pub use plugin::StrategyPlugin;
pub use rng::rng_for_date;
