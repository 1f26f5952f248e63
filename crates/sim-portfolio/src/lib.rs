//! Portfolio State (C2): cash, positions, cumulative contributions and costs
//! for one strategy, plus the accounting identity the engine checks after
//! every daily step.
//!
//! v1 positions are long-only, so this keeps a single non-negative share
//! count and a volume-weighted average cost per symbol instead of the
//! short-capable FIFO lot list a live-trading book would need — cost basis
//! here is reporting-only, never used to compute realized P&L, since the
//! only valuation path is mark-to-market equity.

mod accounting;
mod error;
mod metrics;
mod types;

pub use accounting::{credit_cash, debit_cash, apply_fill, mark_to_market, recompute_from_ledger};
pub use error::PortfolioError;
pub use metrics::{check_accounting_identity, compute_positions_market_value_micros};
pub use types::{CashEntry, LedgerEntry, PortfolioState, PositionState};

/// Smallest unit of money/shares treated as distinguishable from zero —
/// positions "round to zero within a small epsilon" at this threshold, and
/// the accounting identity is allowed to drift by this much before it's
/// flagged fatal.
pub const EPS_MICROS: i64 = 1;
