use sim_execution::ExecutionParams;
use sim_strategy::StrategyPlugin;
use sim_types::{DailyRecord, MarketSnapshot, SimulationConfig, StrategyConfig, TradeFill};

use crate::error::EngineError;
use crate::run::StrategyRun;

/// Everything a single `run`/`run_parallel` call produced: every strategy's
/// daily records (config order, then date within a strategy) and fills
/// (sorted `(date, strategy_id, symbol)`, per §5), plus whether the run was
/// stopped early by the cooperative cancellation signal.
pub struct SimulationOutcome {
    pub daily_records: Vec<DailyRecord>,
    pub fills: Vec<TradeFill>,
    pub cancelled: bool,
}

/// Builds one `StrategyRun` per configured strategy, falling back to the
/// simulation-wide defaults for any field a strategy doesn't override.
fn build_runs(config: &SimulationConfig) -> Result<Vec<StrategyRun>, EngineError> {
    config
        .strategies
        .iter()
        .map(|sc| build_run(config, sc))
        .collect()
}

fn build_run(config: &SimulationConfig, sc: &StrategyConfig) -> Result<StrategyRun, EngineError> {
    let plugin = StrategyPlugin::from_config(sc)?;

    let (contribution_amount_micros, contribution_frequency) = match &sc.contributions {
        Some(over) => (
            sim_types::round_to_micros(over.amount),
            over.frequency,
        ),
        None => (config.contribution_amount_micros, config.contribution_frequency),
    };

    let execution_params = match &sc.execution {
        Some(over) => ExecutionParams {
            fee_bps_micros: over
                .fee_bps
                .map(sim_types::round_to_micros)
                .unwrap_or(config.fee_bps_micros),
            fee_fixed_micros: over
                .fee_fixed
                .map(sim_types::round_to_micros)
                .unwrap_or(config.fee_fixed_micros),
            slippage_bps_micros: over
                .slippage_bps
                .map(sim_types::round_to_micros)
                .unwrap_or(config.slippage_bps_micros),
            max_trade_participation_micros: over
                .max_trade_participation
                .map(sim_types::round_to_micros)
                .unwrap_or(config.max_trade_participation_micros),
        },
        None => ExecutionParams {
            fee_bps_micros: config.fee_bps_micros,
            fee_fixed_micros: config.fee_fixed_micros,
            slippage_bps_micros: config.slippage_bps_micros,
            max_trade_participation_micros: config.max_trade_participation_micros,
        },
    };

    Ok(StrategyRun::new(
        sc.strategy_id.clone(),
        plugin,
        config.initial_capital_micros,
        sc.rebalance.frequency,
        contribution_frequency,
        contribution_amount_micros,
        execution_params,
        config.credit_dividends,
    ))
}

/// Drives every configured strategy in lockstep over one read-once
/// `MarketDataSource`, in config order, per §5's "single forward pass over
/// the data regardless of strategy count" guarantee.
///
/// `should_cancel` is polled once per date between snapshots; on returning
/// `true`, the run stops after finishing the in-flight date and the outcome
/// is flagged `cancelled`.
///
/// `source` is generic over anything that yields `MarketSnapshot`s in
/// ascending date order — `sim_marketdata::MarketDataSource` in production,
/// a plain `Vec`/iterator of hand-built snapshots in tests.
pub fn run(
    config: &SimulationConfig,
    source: impl IntoIterator<Item = MarketSnapshot>,
    should_cancel: &dyn Fn() -> bool,
) -> Result<SimulationOutcome, EngineError> {
    let mut runs = build_runs(config)?;
    let mut cancelled = false;

    for snapshot in source {
        if should_cancel() {
            cancelled = true;
            break;
        }
        for run in &mut runs {
            run.step(snapshot.date, &snapshot)?;
        }
    }

    let mut daily_records = Vec::new();
    let mut fills = Vec::new();
    for run in runs {
        daily_records.extend(run.daily_records);
        fills.extend(run.fills);
    }
    sort_fills(&mut fills);

    Ok(SimulationOutcome {
        daily_records,
        fills,
        cancelled,
    })
}

/// Legal optimization per §5: no shared mutable state exists between
/// strategies, so each may advance over its own clone of the snapshot
/// sequence on its own thread. Requires materializing the snapshot stream
/// first (one scan) since `std::thread::scope` needs `&MarketSnapshot`
/// borrows that outlive each per-strategy loop; the trade ledger is
/// re-sorted to `(date, strategy_id, symbol)` before returning, since
/// per-thread completion order has no relation to that ordering (§5).
pub fn run_parallel(
    config: &SimulationConfig,
    source: impl IntoIterator<Item = MarketSnapshot>,
    should_cancel: &(dyn Fn() -> bool + Sync),
) -> Result<SimulationOutcome, EngineError> {
    let snapshots: Vec<_> = source.into_iter().collect();
    let mut runs = build_runs(config)?;
    let cancelled = std::sync::atomic::AtomicBool::new(false);

    let results: Vec<Result<StrategyRun, EngineError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = runs
            .drain(..)
            .map(|mut run| {
                let snapshots = &snapshots;
                let cancelled = &cancelled;
                scope.spawn(move || {
                    for snapshot in snapshots {
                        if should_cancel() {
                            cancelled.store(true, std::sync::atomic::Ordering::Relaxed);
                            break;
                        }
                        run.step(snapshot.date, snapshot)?;
                    }
                    Ok(run)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("strategy thread panicked"))
            .collect()
    });

    let mut daily_records = Vec::new();
    let mut fills = Vec::new();
    for result in results {
        let run = result?;
        daily_records.extend(run.daily_records);
        fills.extend(run.fills);
    }
    sort_fills(&mut fills);

    Ok(SimulationOutcome {
        daily_records,
        fills,
        cancelled: cancelled.load(std::sync::atomic::Ordering::Relaxed),
    })
}

/// §5: "trade ledger entries are emitted in `(date, strategy_id, symbol)`
/// order within a day." Each `StrategyRun` already appends its own fills in
/// execution order (sells lexicographic, then buys lexicographic, per
/// §4.3), which is neither strategy-major nor symbol-sorted once every
/// strategy's fills are concatenated — so the combined ledger is always
/// re-sorted by the full key before being handed to the caller.
fn sort_fills(fills: &mut [TradeFill]) {
    fills.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.strategy_id.cmp(&b.strategy_id))
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
}
