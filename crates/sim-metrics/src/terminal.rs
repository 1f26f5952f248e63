use std::collections::BTreeMap;

use sim_types::{DailyRecord, TradeFill};

use crate::stats::{annualized_volatility, finite_only, max_drawdown, mean, sharpe_proxy};

/// One strategy's terminal row of `terminal_summary.csv` (§6).
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalSummary {
    pub strategy_id: String,
    pub final_equity_micros: i64,
    pub total_contributions_micros: i64,
    pub net_profit_micros: i64,
    pub cagr: f64,
    pub max_drawdown: f64,
    pub annualized_volatility: f64,
    pub sharpe_proxy: f64,
    pub total_trades: u64,
    pub avg_turnover: f64,
}

/// Derives one `TerminalSummary` per strategy present in `records`, per
/// §4.7. `records` and `fills` need not be pre-grouped; this groups both by
/// `strategy_id` internally. `initial_capital_micros` is the one run-wide
/// starting equity shared by every strategy's `PortfolioState`.
pub fn compute_terminal_summaries(
    records: &[DailyRecord],
    fills: &[TradeFill],
    initial_capital_micros: i64,
) -> Vec<TerminalSummary> {
    let mut by_strategy: BTreeMap<&str, Vec<&DailyRecord>> = BTreeMap::new();
    for r in records {
        by_strategy.entry(r.strategy_id.as_str()).or_default().push(r);
    }
    let mut trades_by_strategy: BTreeMap<&str, u64> = BTreeMap::new();
    for f in fills {
        *trades_by_strategy.entry(f.strategy_id.as_str()).or_insert(0) += 1;
    }

    let mut out = Vec::new();
    for (strategy_id, mut recs) in by_strategy {
        recs.sort_by_key(|r| r.date);

        let first = *recs.first().expect("strategy has at least one record");
        let last = *recs.last().expect("strategy has at least one record");

        let final_equity_micros = last.total_equity_micros;
        let total_contributions_micros = last.contribution_cumulative_micros;
        let net_profit_micros =
            final_equity_micros - initial_capital_micros - total_contributions_micros;

        let total_invested_micros = initial_capital_micros + total_contributions_micros;
        let years = years_spanned(first, last);
        let cagr = if total_invested_micros > 0 && years > 0.0 {
            (final_equity_micros as f64 / total_invested_micros as f64).powf(1.0 / years) - 1.0
        } else {
            f64::NAN
        };

        let daily_returns: Vec<f64> =
            finite_only(&recs.iter().map(|r| r.daily_return).collect::<Vec<_>>());
        let equity_curve: Vec<i64> = recs.iter().map(|r| r.total_equity_micros).collect();

        let total_trades = trades_by_strategy.get(strategy_id).copied().unwrap_or(0);
        let avg_turnover = mean(&recs.iter().map(|r| r.turnover_day).collect::<Vec<_>>());

        out.push(TerminalSummary {
            strategy_id: strategy_id.to_string(),
            final_equity_micros,
            total_contributions_micros,
            net_profit_micros,
            cagr,
            max_drawdown: max_drawdown(&equity_curve),
            annualized_volatility: annualized_volatility(&daily_returns),
            sharpe_proxy: sharpe_proxy(&daily_returns),
            total_trades,
            avg_turnover,
        });
    }
    out
}

/// Whole-and-fractional years between a strategy's first and last
/// `DailyRecord`, used as the CAGR exponent's denominator. A single-day run
/// (`years == 0`) makes CAGR undefined rather than a divide-by-near-zero
/// blowup.
fn years_spanned(first: &DailyRecord, last: &DailyRecord) -> f64 {
    let days = (last.date - first.date).num_days();
    days as f64 / 365.25
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sim_types::Side;

    fn rec(date: &str, strategy_id: &str, equity: i64, ret: f64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            strategy_id: strategy_id.to_string(),
            cash_micros: 0,
            positions_market_value_micros: equity,
            total_equity_micros: equity,
            daily_return: ret,
            cumulative_return: 0.0,
            contribution_cumulative_micros: 0,
            trade_count_day: 0,
            turnover_day: 0.1,
        }
    }

    fn fill(strategy_id: &str, symbol: &str) -> TradeFill {
        TradeFill {
            date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            strategy_id: strategy_id.to_string(),
            symbol: symbol.to_string(),
            side: Side::Buy,
            shares_micros: 1_000_000,
            executed_price_micros: 100_000_000,
            gross_value_micros: 100_000_000,
            slippage_cost_micros: 0,
            fee_cost_micros: 0,
            net_cash_impact_micros: -100_000_000,
        }
    }

    #[test]
    fn net_profit_subtracts_initial_capital_and_contributions() {
        let records = vec![
            rec("2020-01-02", "s1", 10_000_000_000, 0.0),
            rec("2021-01-04", "s1", 12_000_000_000, 0.0),
        ];
        let summaries = compute_terminal_summaries(&records, &[], 10_000_000_000);
        assert_eq!(summaries[0].net_profit_micros, 2_000_000_000);
    }

    #[test]
    fn total_trades_counts_only_this_strategys_fills() {
        let records = vec![
            rec("2020-01-02", "s1", 10_000_000_000, 0.0),
            rec("2020-01-02", "s2", 10_000_000_000, 0.0),
        ];
        let fills = vec![fill("s1", "AAA"), fill("s1", "BBB"), fill("s2", "AAA")];
        let summaries = compute_terminal_summaries(&records, &fills, 10_000_000_000);
        let s1 = summaries.iter().find(|s| s.strategy_id == "s1").unwrap();
        let s2 = summaries.iter().find(|s| s.strategy_id == "s2").unwrap();
        assert_eq!(s1.total_trades, 2);
        assert_eq!(s2.total_trades, 1);
    }
}
