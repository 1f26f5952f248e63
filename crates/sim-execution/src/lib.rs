//! Cost & Execution Model (C3): converts a `TargetAllocation` into a list of
//! `TradeFill`s subject to slippage, fees, the liquidity participation cap,
//! epsilon trade suppression, and cash-feasibility clipping.

mod params;
mod pricing;

pub use params::ExecutionParams;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use sim_portfolio::PortfolioState;
use sim_types::{MarketSnapshot, Side, TargetAllocation, TradeFill, MICROS_SCALE};

use pricing::{apply_fees, apply_slippage};

/// One proposed share-quantity change, after liquidity clipping, before the
/// cash-feasibility pass.
#[derive(Clone)]
struct DesiredTrade {
    symbol: String,
    side: Side,
    shares_micros: i64,
    close_micros: i64,
}

/// §4.3: the valuation basis is `total_equity` after contributions but
/// before trades; execution price is the day's close. Returns fills in
/// sell-then-buy order, each side sorted lexicographically by symbol, ready
/// to be applied to `pf` via `sim_portfolio::apply_fill`.
pub fn compute_fills(
    pf: &PortfolioState,
    snapshot: &MarketSnapshot,
    target: &TargetAllocation,
    date: NaiveDate,
    strategy_id: &str,
    params: &ExecutionParams,
) -> Vec<TradeFill> {
    let valuation_basis_micros = pf.total_equity_micros();
    if valuation_basis_micros <= 0 {
        return Vec::new();
    }

    let mut symbols: BTreeMap<&str, ()> = BTreeMap::new();
    for symbol in target.weights_micros.keys() {
        symbols.insert(symbol.as_str(), ());
    }
    for symbol in pf.positions.keys() {
        symbols.insert(symbol.as_str(), ());
    }

    let eps_trade_micros = (valuation_basis_micros as i128 / 1_000_000).max(1) as i64;

    let mut sells = Vec::new();
    let mut buys = Vec::new();

    for symbol in symbols.keys() {
        let close_micros = match snapshot.close_micros(symbol) {
            Some(c) => c,
            None => continue, // not tradable today; accept the drift
        };
        let volume = snapshot.bars.get(*symbol).map(|b| b.volume).unwrap_or(0);
        let target_weight_micros = target.weights_micros.get(*symbol).copied().unwrap_or(0);
        let target_value_micros = (valuation_basis_micros as i128 * target_weight_micros as i128
            / MICROS_SCALE as i128) as i64;
        let target_shares_micros =
            (target_value_micros as i128 * MICROS_SCALE as i128 / close_micros as i128) as i64;
        let current_shares_micros = pf
            .positions
            .get(*symbol)
            .map(|p| p.qty_micros)
            .unwrap_or(0);
        let delta_micros = target_shares_micros - current_shares_micros;
        if delta_micros == 0 {
            continue;
        }

        let side = if delta_micros > 0 { Side::Buy } else { Side::Sell };
        let max_shares_micros = (params.max_trade_participation_micros as i128 * volume as i128)
            .max(0) as i64;
        let shares_micros = delta_micros.unsigned_abs() as i64;
        let clipped_shares_micros = shares_micros.min(max_shares_micros);
        if clipped_shares_micros <= 0 {
            continue;
        }
        if clipped_shares_micros < shares_micros {
            tracing::warn!(
                symbol = %symbol,
                wanted_shares_micros = shares_micros,
                capped_shares_micros = clipped_shares_micros,
                "liquidity participation cap clipped a trade"
            );
        }

        let trade = DesiredTrade {
            symbol: symbol.to_string(),
            side,
            shares_micros: clipped_shares_micros,
            close_micros,
        };
        match side {
            Side::Sell => sells.push(trade),
            Side::Buy => buys.push(trade),
        }
    }

    sells.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    buys.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    let mut fills = Vec::new();
    let mut running_cash_micros = pf.cash_micros;

    for trade in &sells {
        if let Some(fill) = build_fill(trade, date, strategy_id, params, eps_trade_micros, None) {
            running_cash_micros += fill.net_cash_impact_micros;
            fills.push(fill);
        }
    }

    for trade in &buys {
        let affordable_cash_micros = running_cash_micros.max(0);
        if let Some(fill) = build_fill(
            trade,
            date,
            strategy_id,
            params,
            eps_trade_micros,
            Some(affordable_cash_micros),
        ) {
            running_cash_micros += fill.net_cash_impact_micros;
            fills.push(fill);
        }
    }

    fills
}

/// Builds one fill from a (already liquidity-clipped) desired trade,
/// applying slippage and fees, suppressing it below the epsilon threshold,
/// and — for buys only, when `max_affordable_cash_micros` is given — scaling
/// it down to what cash allows (§4.3 point 7).
fn build_fill(
    trade: &DesiredTrade,
    date: NaiveDate,
    strategy_id: &str,
    params: &ExecutionParams,
    eps_trade_micros: i64,
    max_affordable_cash_micros: Option<i64>,
) -> Option<TradeFill> {
    let mut shares_micros = trade.shares_micros;
    let executed_price_micros = apply_slippage(trade.close_micros, trade.side, params);
    let mut gross_value_micros =
        (shares_micros as i128 * trade.close_micros as i128 / MICROS_SCALE as i128) as i64;

    if let Some(max_cash) = max_affordable_cash_micros {
        let slip_frac_micros = params.slippage_bps_micros / 10_000;
        let fee_frac_micros = params.fee_bps_micros / 10_000;
        let cost_per_unit_micros = MICROS_SCALE + slip_frac_micros + fee_frac_micros;
        let available_for_gross = max_cash.saturating_sub(params.fee_fixed_micros).max(0);
        let affordable_gross = (available_for_gross as i128 * MICROS_SCALE as i128
            / cost_per_unit_micros.max(1) as i128) as i64;
        if affordable_gross < gross_value_micros {
            gross_value_micros = affordable_gross.max(0);
            shares_micros = if trade.close_micros > 0 {
                (gross_value_micros as i128 * MICROS_SCALE as i128 / trade.close_micros as i128)
                    as i64
            } else {
                0
            };
        }
    }

    if shares_micros <= 0 || gross_value_micros.abs() < eps_trade_micros {
        return None;
    }

    let slippage_cost_micros = ((executed_price_micros - trade.close_micros).unsigned_abs()
        as i128
        * shares_micros as i128
        / MICROS_SCALE as i128) as i64;
    let fee_cost_micros = apply_fees(gross_value_micros, params);

    let sign: i64 = match trade.side {
        Side::Buy => -1,
        Side::Sell => 1,
    };
    let net_cash_impact_micros = sign * gross_value_micros - (slippage_cost_micros + fee_cost_micros);

    Some(TradeFill {
        date,
        strategy_id: strategy_id.to_string(),
        symbol: trade.symbol.clone(),
        side: trade.side,
        shares_micros,
        executed_price_micros,
        gross_value_micros,
        slippage_cost_micros,
        fee_cost_micros,
        net_cash_impact_micros,
    })
}
