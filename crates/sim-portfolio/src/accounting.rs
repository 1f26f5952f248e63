use sim_types::{MarketSnapshot, Side, TradeFill};

use crate::error::PortfolioError;
use crate::types::{CashEntry, LedgerEntry, PortfolioState, PositionState};
use crate::EPS_MICROS;

pub fn credit_cash(pf: &mut PortfolioState, amount_micros: i64) {
    debug_assert!(amount_micros >= 0, "credit_cash amount must be >= 0");
    pf.cash_micros = pf.cash_micros.saturating_add(amount_micros);
    pf.ledger.push(LedgerEntry::Cash(CashEntry {
        amount_micros,
        reason: "credit",
    }));
}

pub fn debit_cash(pf: &mut PortfolioState, amount_micros: i64) -> Result<(), PortfolioError> {
    debug_assert!(amount_micros >= 0, "debit_cash amount must be >= 0");
    if amount_micros > pf.cash_micros + EPS_MICROS {
        return Err(PortfolioError::NegativeCash {
            attempted_debit_micros: amount_micros,
            available_micros: pf.cash_micros,
        });
    }
    pf.cash_micros -= amount_micros;
    pf.ledger.push(LedgerEntry::Cash(CashEntry {
        amount_micros: -amount_micros,
        reason: "debit",
    }));
    Ok(())
}

/// Applies one executed fill: moves cash by `net_cash_impact_micros`, then
/// grows or shrinks the symbol's long-only position. `shares` sold may never
/// exceed the held quantity — C3 is responsible for never proposing such a
/// fill; this function does not clip, it fails fatally if asked to.
pub fn apply_fill(pf: &mut PortfolioState, fill: &TradeFill) -> Result<(), PortfolioError> {
    let new_cash = pf.cash_micros + fill.net_cash_impact_micros;
    if new_cash < -EPS_MICROS {
        return Err(PortfolioError::NegativeCash {
            attempted_debit_micros: -fill.net_cash_impact_micros,
            available_micros: pf.cash_micros,
        });
    }
    pf.cash_micros = new_cash.max(0);
    pf.cumulative_costs_micros += fill.slippage_cost_micros + fill.fee_cost_micros;

    let entry = pf.positions.entry(fill.symbol.clone()).or_insert(PositionState {
        qty_micros: 0,
        avg_cost_micros: 0,
        last_close_micros: fill.executed_price_micros,
    });

    match fill.side {
        Side::Buy => {
            let new_qty = entry.qty_micros as i128 + fill.shares_micros as i128;
            let cost_basis = entry.qty_micros as i128 * entry.avg_cost_micros as i128
                + fill.shares_micros as i128 * fill.executed_price_micros as i128;
            entry.avg_cost_micros = if new_qty > 0 {
                (cost_basis / new_qty) as i64
            } else {
                0
            };
            entry.qty_micros = new_qty as i64;
        }
        Side::Sell => {
            entry.qty_micros -= fill.shares_micros;
        }
    }
    entry.last_close_micros = fill.executed_price_micros;

    if entry.qty_micros.abs() <= EPS_MICROS {
        pf.positions.remove(&fill.symbol);
    }

    pf.ledger.push(LedgerEntry::Fill(fill.clone()));
    Ok(())
}

/// Recomputes `positions_market_value_micros` using each symbol's close on
/// `snapshot`, carrying the last known close forward for symbols currently
/// absent (§4.2's "absent symbols contribute their last seen close"). Fails
/// if a held symbol has never had a close recorded.
pub fn mark_to_market(
    pf: &mut PortfolioState,
    snapshot: &MarketSnapshot,
) -> Result<(), PortfolioError> {
    let mut total: i128 = 0;
    for (symbol, position) in pf.positions.iter_mut() {
        if let Some(close) = snapshot.close_micros(symbol) {
            position.last_close_micros = close;
        } else if position.last_close_micros == 0 {
            return Err(PortfolioError::MissingPriorClose {
                symbol: symbol.clone(),
            });
        }
        total += position.qty_micros as i128 * position.last_close_micros as i128
            / sim_types::MICROS_SCALE as i128;
    }
    pf.positions_market_value_micros = total.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
    Ok(())
}

/// Replays a ledger from scratch into a fresh `(cash, positions)` pair,
/// independent of any incrementally maintained state. Used by the
/// determinism/idempotent-replay tests to confirm the incremental path and
/// a from-scratch replay never diverge, mirroring the corpus's
/// `recompute_from_ledger` check.
pub fn recompute_from_ledger(
    initial_cash_micros: i64,
    ledger: &[LedgerEntry],
) -> Result<PortfolioState, PortfolioError> {
    let mut pf = PortfolioState::new(initial_cash_micros);
    for entry in ledger {
        match entry {
            LedgerEntry::Cash(c) if c.amount_micros >= 0 => credit_cash(&mut pf, c.amount_micros),
            LedgerEntry::Cash(c) => debit_cash(&mut pf, -c.amount_micros)?,
            LedgerEntry::Fill(f) => apply_fill(&mut pf, f)?,
        }
    }
    Ok(pf)
}
