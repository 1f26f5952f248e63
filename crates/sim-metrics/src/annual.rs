use std::collections::BTreeMap;

use chrono::Datelike;
use sim_types::DailyRecord;

use crate::stats::{finite_only, max_drawdown, stdev};

/// One (strategy, year) row of `annual_summary.csv` (§6).
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualSummary {
    pub strategy_id: String,
    pub year: i32,
    pub start_equity_micros: i64,
    pub end_equity_micros: i64,
    pub net_contributions_year_micros: i64,
    pub return_year: f64,
    pub max_drawdown_year: f64,
    pub volatility_year: f64,
}

/// Buckets `records` by `(strategy_id, year)` and derives one `AnnualSummary`
/// per bucket, per §4.7. `records` need not be sorted on entry — each
/// strategy's own records are re-sorted by date internally — but within a
/// strategy they are expected not to contain duplicate dates (the engine
/// never produces those). `initial_capital_micros` is the one run-wide
/// starting equity every strategy's `PortfolioState` was constructed with;
/// it seeds `start_equity` for each strategy's first year, per §4.7's
/// "initial capital if first year".
pub fn compute_annual_summaries(
    records: &[DailyRecord],
    initial_capital_micros: i64,
) -> Vec<AnnualSummary> {
    let mut by_strategy: BTreeMap<&str, Vec<&DailyRecord>> = BTreeMap::new();
    for r in records {
        by_strategy.entry(r.strategy_id.as_str()).or_default().push(r);
    }

    let mut out = Vec::new();
    for (strategy_id, mut recs) in by_strategy {
        recs.sort_by_key(|r| r.date);

        let mut by_year: BTreeMap<i32, Vec<&DailyRecord>> = BTreeMap::new();
        for r in &recs {
            by_year.entry(r.date.year()).or_default().push(r);
        }

        let mut prior_year_end_equity_micros = initial_capital_micros;
        let mut prior_cumulative_contributions_micros = 0i64;

        for (year, year_recs) in by_year {
            let start_equity_micros = prior_year_end_equity_micros;
            let end_equity_micros = year_recs.last().unwrap().total_equity_micros;
            let end_cumulative_contributions_micros =
                year_recs.last().unwrap().contribution_cumulative_micros;
            let net_contributions_year_micros =
                end_cumulative_contributions_micros - prior_cumulative_contributions_micros;

            let daily_returns: Vec<f64> = finite_only(
                &year_recs.iter().map(|r| r.daily_return).collect::<Vec<_>>(),
            );
            let return_year = daily_returns
                .iter()
                .fold(1.0f64, |acc, r| acc * (1.0 + r))
                - 1.0;
            let volatility_year = stdev(&daily_returns) * (252.0f64).sqrt();
            let equity_curve: Vec<i64> = year_recs.iter().map(|r| r.total_equity_micros).collect();
            let max_drawdown_year = max_drawdown(&equity_curve);

            out.push(AnnualSummary {
                strategy_id: strategy_id.to_string(),
                year,
                start_equity_micros,
                end_equity_micros,
                net_contributions_year_micros,
                return_year,
                max_drawdown_year,
                volatility_year,
            });

            prior_year_end_equity_micros = end_equity_micros;
            prior_cumulative_contributions_micros = end_cumulative_contributions_micros;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(date: &str, strategy_id: &str, equity: i64, contrib_cum: i64, ret: f64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            strategy_id: strategy_id.to_string(),
            cash_micros: 0,
            positions_market_value_micros: equity,
            total_equity_micros: equity,
            daily_return: ret,
            cumulative_return: 0.0,
            contribution_cumulative_micros: contrib_cum,
            trade_count_day: 0,
            turnover_day: 0.0,
        }
    }

    #[test]
    fn two_years_produce_two_rows_with_correct_start_equity() {
        let records = vec![
            rec("2020-01-02", "s1", 10_000_000_000, 0, 0.0),
            rec("2020-12-31", "s1", 11_000_000_000, 0, 0.02),
            rec("2021-01-04", "s1", 11_100_000_000, 0, 0.0090909),
        ];
        let summaries = compute_annual_summaries(&records, 10_000_000_000);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].year, 2020);
        assert_eq!(summaries[0].start_equity_micros, 10_000_000_000);
        assert_eq!(summaries[0].end_equity_micros, 11_000_000_000);
        assert_eq!(summaries[1].year, 2021);
        assert_eq!(summaries[1].start_equity_micros, 11_000_000_000);
    }

    #[test]
    fn net_contributions_is_the_in_year_delta_not_the_cumulative_total() {
        let records = vec![
            rec("2020-01-02", "s1", 10_000_000_000, 1_000_000, 0.0),
            rec("2020-12-31", "s1", 11_000_000_000, 5_000_000, 0.0),
            rec("2021-01-04", "s1", 11_100_000_000, 9_000_000, 0.0),
        ];
        let summaries = compute_annual_summaries(&records, 10_000_000_000);
        assert_eq!(summaries[0].net_contributions_year_micros, 5_000_000);
        assert_eq!(summaries[1].net_contributions_year_micros, 4_000_000);
    }
}
