use std::collections::BTreeMap;

use sim_types::TradeFill;

/// A long-only holding. Created on first buy, destroyed when `qty_micros`
/// rounds to zero within `EPS_MICROS`. `avg_cost_micros` is informational
/// (reporting only); it is never read back to compute realized P&L.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionState {
    pub qty_micros: i64,
    pub avg_cost_micros: i64,
    /// Close most recently observed for this symbol, carried forward for
    /// mark-to-market on days the symbol is absent from the snapshot.
    pub last_close_micros: i64,
}

/// One appended cash movement not tied to a trade (a contribution or a
/// dividend credit).
#[derive(Debug, Clone)]
pub struct CashEntry {
    pub amount_micros: i64,
    pub reason: &'static str,
}

/// An append-only record of everything that has touched cash or positions,
/// kept so `recompute_from_ledger` can independently re-derive state from
/// scratch as a determinism/idempotent-replay check.
#[derive(Debug, Clone)]
pub enum LedgerEntry {
    Cash(CashEntry),
    Fill(TradeFill),
}

/// Per-strategy mutable aggregate: cash, positions, and running totals.
/// Each `StrategyRun` exclusively owns one of these; `MarketSnapshot`s are
/// borrowed, never owned, by contrast.
#[derive(Debug, Clone)]
pub struct PortfolioState {
    pub cash_micros: i64,
    pub positions: BTreeMap<String, PositionState>,
    pub cumulative_contributions_micros: i64,
    pub cumulative_costs_micros: i64,
    pub positions_market_value_micros: i64,
    pub ledger: Vec<LedgerEntry>,
}

impl PortfolioState {
    pub fn new(initial_cash_micros: i64) -> Self {
        Self {
            cash_micros: initial_cash_micros,
            positions: BTreeMap::new(),
            cumulative_contributions_micros: 0,
            cumulative_costs_micros: 0,
            positions_market_value_micros: 0,
            ledger: Vec::new(),
        }
    }

    pub fn total_equity_micros(&self) -> i64 {
        self.cash_micros + self.positions_market_value_micros
    }
}
