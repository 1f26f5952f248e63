use chrono::NaiveDate;
use sim_execution::{compute_fills, ExecutionParams};
use sim_portfolio::{apply_fill, check_accounting_identity, credit_cash, mark_to_market, PortfolioState, EPS_MICROS};
use sim_strategy::StrategyPlugin;
use sim_types::{ContributionFrequency, DailyRecord, MarketSnapshot, RebalanceFrequency, TradeFill};

use crate::error::EngineError;
use crate::scheduler::Scheduler;

/// One strategy's exclusively-owned mutable state, advanced one date at a
/// time over the shared snapshot stream (§5: "each strategy owns its
/// state"). Everything needed to reproduce the run end to end lives here or
/// in the fills/records it has already emitted.
pub struct StrategyRun {
    pub strategy_id: String,
    plugin: StrategyPlugin,
    portfolio: PortfolioState,
    scheduler: Scheduler,
    rebalance_frequency: RebalanceFrequency,
    contribution_frequency: ContributionFrequency,
    contribution_amount_micros: i64,
    execution_params: ExecutionParams,
    credit_dividends: bool,
    prev_total_equity_micros: i64,
    has_prior_record: bool,
    initial_capital_micros: i64,
    pub daily_records: Vec<DailyRecord>,
    pub fills: Vec<TradeFill>,
}

impl StrategyRun {
    pub fn new(
        strategy_id: String,
        plugin: StrategyPlugin,
        initial_capital_micros: i64,
        rebalance_frequency: RebalanceFrequency,
        contribution_frequency: ContributionFrequency,
        contribution_amount_micros: i64,
        execution_params: ExecutionParams,
        credit_dividends: bool,
    ) -> Self {
        Self {
            strategy_id,
            plugin,
            portfolio: PortfolioState::new(initial_capital_micros),
            scheduler: Scheduler::new(),
            rebalance_frequency,
            contribution_frequency,
            contribution_amount_micros,
            execution_params,
            credit_dividends,
            prev_total_equity_micros: initial_capital_micros,
            has_prior_record: false,
            initial_capital_micros,
            daily_records: Vec::new(),
            fills: Vec::new(),
        }
    }

    /// The exact seven-step per-date sequence from §4.6. Appends one
    /// `DailyRecord` and zero or more `TradeFill`s on success.
    pub fn step(&mut self, date: NaiveDate, snapshot: &MarketSnapshot) -> Result<(), EngineError> {
        // 1. Observe snapshot for D — `snapshot` is the parameter itself.

        // 2. Credit dividends, if enabled, before rebalance valuation.
        if self.credit_dividends {
            let mut dividend_cash_micros: i128 = 0;
            for (symbol, position) in &self.portfolio.positions {
                if let Some(bar) = snapshot.bars.get(symbol) {
                    if bar.dividend_micros > 0 {
                        dividend_cash_micros += position.qty_micros as i128
                            * bar.dividend_micros as i128
                            / sim_types::MICROS_SCALE as i128;
                    }
                }
            }
            if dividend_cash_micros > 0 {
                credit_cash(&mut self.portfolio, dividend_cash_micros as i64);
            }
        }

        // 3. Credit contribution, if due for D.
        let contribution_due = self
            .scheduler
            .contribution_due(self.contribution_frequency, date);
        if contribution_due && self.contribution_amount_micros > 0 {
            credit_cash(&mut self.portfolio, self.contribution_amount_micros);
            self.portfolio.cumulative_contributions_micros += self.contribution_amount_micros;
        }

        // 4. Rebalance, if due for D: plugin -> TargetAllocation -> fills -> apply.
        let rebalance_due = self.scheduler.rebalance_due(self.rebalance_frequency, date);
        let mut trade_count_day = 0u32;
        let mut turnover_gross_micros: i128 = 0;
        let valuation_basis_micros = self.portfolio.total_equity_micros();
        if rebalance_due {
            let target = self.plugin.on_rebalance(date, snapshot)?;
            let fills = compute_fills(
                &self.portfolio,
                snapshot,
                &target,
                date,
                &self.strategy_id,
                &self.execution_params,
            );
            for fill in &fills {
                apply_fill(&mut self.portfolio, fill)?;
                turnover_gross_micros += fill.gross_value_micros.unsigned_abs() as i128;
                trade_count_day += 1;
                self.fills.push(fill.clone());
            }
        }

        // 5. Mark-to-market at close.
        mark_to_market(&mut self.portfolio, snapshot)?;
        check_accounting_identity(&self.portfolio, EPS_MICROS)?;

        // 6. Compute daily_return.
        let total_equity_micros = self.portfolio.total_equity_micros();
        let contribution_today_micros = if contribution_due {
            self.contribution_amount_micros
        } else {
            0
        };
        let daily_return = if !self.has_prior_record {
            0.0
        } else if self.prev_total_equity_micros == 0 {
            f64::NAN
        } else {
            let prev = self.prev_total_equity_micros as f64;
            let contrib = contribution_today_micros as f64;
            (total_equity_micros as f64 - prev - contrib) / prev
        };
        let cumulative_return = if self.initial_capital_micros == 0 {
            f64::NAN
        } else {
            total_equity_micros as f64 / self.initial_capital_micros as f64 - 1.0
        };
        let turnover_day = if valuation_basis_micros > 0 {
            turnover_gross_micros as f64 / valuation_basis_micros as f64
        } else {
            0.0
        };

        // 7. Append DailyRecord.
        self.daily_records.push(DailyRecord {
            date,
            strategy_id: self.strategy_id.clone(),
            cash_micros: self.portfolio.cash_micros,
            positions_market_value_micros: self.portfolio.positions_market_value_micros,
            total_equity_micros,
            daily_return,
            cumulative_return,
            contribution_cumulative_micros: self.portfolio.cumulative_contributions_micros,
            trade_count_day,
            turnover_day,
        });

        self.prev_total_equity_micros = total_equity_micros;
        self.has_prior_record = true;
        Ok(())
    }
}
