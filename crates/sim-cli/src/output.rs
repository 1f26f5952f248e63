use std::path::Path;

use serde::Serialize;
use sim_metrics::{AnnualSummary, TerminalSummary};
use sim_types::{micros_to_f64, DailyRecord, TradeFill};

use crate::error::CliError;

/// Writes `daily_equity.csv` (§6: one row per strategy per trading day).
pub fn write_daily_equity(dir: &Path, records: &[DailyRecord]) -> Result<(), CliError> {
    let mut w = csv::Writer::from_path(dir.join("daily_equity.csv"))?;
    w.write_record([
        "date",
        "strategy_id",
        "cash",
        "positions_market_value",
        "total_equity",
        "daily_return",
        "cumulative_return",
        "contribution_cumulative",
        "trade_count_day",
        "turnover_day",
    ])?;
    for r in records {
        w.write_record(&[
            r.date.to_string(),
            r.strategy_id.clone(),
            micros_to_f64(r.cash_micros).to_string(),
            micros_to_f64(r.positions_market_value_micros).to_string(),
            micros_to_f64(r.total_equity_micros).to_string(),
            r.daily_return.to_string(),
            r.cumulative_return.to_string(),
            micros_to_f64(r.contribution_cumulative_micros).to_string(),
            r.trade_count_day.to_string(),
            r.turnover_day.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Writes `trades.csv` (§6: one row per executed fill, already sorted
/// `(date, strategy_id, symbol)` by `sim_engine::run`/`run_parallel`).
pub fn write_trades(dir: &Path, fills: &[TradeFill]) -> Result<(), CliError> {
    let mut w = csv::Writer::from_path(dir.join("trades.csv"))?;
    w.write_record([
        "date",
        "strategy_id",
        "symbol",
        "side",
        "shares",
        "price",
        "gross_value",
        "slippage_cost",
        "fee_cost",
        "net_cash_impact",
    ])?;
    for f in fills {
        w.write_record(&[
            f.date.to_string(),
            f.strategy_id.clone(),
            f.symbol.clone(),
            f.side.to_string(),
            micros_to_f64(f.shares_micros).to_string(),
            micros_to_f64(f.executed_price_micros).to_string(),
            micros_to_f64(f.gross_value_micros).to_string(),
            micros_to_f64(f.slippage_cost_micros).to_string(),
            micros_to_f64(f.fee_cost_micros).to_string(),
            micros_to_f64(f.net_cash_impact_micros).to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Writes `annual_summary.csv` (§6: one row per strategy per calendar year).
pub fn write_annual_summary(dir: &Path, summaries: &[AnnualSummary]) -> Result<(), CliError> {
    let mut w = csv::Writer::from_path(dir.join("annual_summary.csv"))?;
    w.write_record([
        "strategy_id",
        "year",
        "start_equity",
        "end_equity",
        "net_contributions_year",
        "return_year",
        "max_drawdown_year",
        "volatility_year",
    ])?;
    for s in summaries {
        w.write_record(&[
            s.strategy_id.clone(),
            s.year.to_string(),
            micros_to_f64(s.start_equity_micros).to_string(),
            micros_to_f64(s.end_equity_micros).to_string(),
            micros_to_f64(s.net_contributions_year_micros).to_string(),
            s.return_year.to_string(),
            s.max_drawdown_year.to_string(),
            s.volatility_year.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Writes `terminal_summary.csv` (§6: one row per strategy, whole-run metrics).
pub fn write_terminal_summary(dir: &Path, summaries: &[TerminalSummary]) -> Result<(), CliError> {
    let mut w = csv::Writer::from_path(dir.join("terminal_summary.csv"))?;
    w.write_record([
        "strategy_id",
        "final_equity",
        "total_contributions",
        "net_profit",
        "cagr",
        "max_drawdown",
        "annualized_volatility",
        "sharpe_proxy",
        "total_trades",
        "avg_turnover",
    ])?;
    for s in summaries {
        w.write_record(&[
            s.strategy_id.clone(),
            micros_to_f64(s.final_equity_micros).to_string(),
            micros_to_f64(s.total_contributions_micros).to_string(),
            micros_to_f64(s.net_profit_micros).to_string(),
            s.cagr.to_string(),
            s.max_drawdown.to_string(),
            s.annualized_volatility.to_string(),
            s.sharpe_proxy.to_string(),
            s.total_trades.to_string(),
            s.avg_turnover.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// `run_manifest.json` (§6): full config echo, seed, dataset path, row
/// counts, software version, wall time, and any non-fatal warnings,
/// including the cooperative-cancellation flag.
#[derive(Debug, Serialize)]
pub struct RunManifest {
    pub config: ManifestConfig,
    pub seed: u64,
    pub dataset_path: String,
    pub total_rows_seen: u64,
    pub invalid_bars_dropped: u64,
    pub software_version: String,
    pub wall_time_seconds: f64,
    pub warnings: Vec<String>,
    pub cancelled: bool,
}

#[derive(Debug, Serialize)]
pub struct ManifestConfig {
    pub start_date: String,
    pub end_date: String,
    pub initial_capital: f64,
    pub contribution_amount: f64,
    pub fee_bps: f64,
    pub fee_fixed: f64,
    pub slippage_bps: f64,
    pub max_trade_participation: f64,
    pub credit_dividends: bool,
    pub price_series_mode: String,
    pub strategy_ids: Vec<String>,
}

pub fn write_run_manifest(dir: &Path, manifest: &RunManifest) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(dir.join("run_manifest.json"), json)?;
    Ok(())
}
