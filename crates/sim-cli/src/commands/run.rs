use std::path::Path;

use sim_engine::SimulationOutcome;
use sim_strategy::StrategyPlugin;
use sim_types::{round_to_micros, SimulationConfig};

use crate::cli::Args;
use crate::error::CliError;
use crate::output::{self, ManifestConfig, RunManifest};
use crate::progress::ProgressSource;

/// Loads + validates the strategy file and run parameters, opens the
/// market-data source, drives the engine, and writes every output artifact.
/// Mirrors §6/§7's "validate everything before opening data" ordering.
pub fn run_simulation(args: &Args) -> Result<(), CliError> {
    let started = std::time::Instant::now();

    let strategies = sim_config::load_strategy_file(Path::new(&args.strategy_file))?;
    for sc in &strategies {
        StrategyPlugin::validate_config(sc)?;
    }

    let config = SimulationConfig {
        start_date: args.start_date,
        end_date: args.end_date,
        initial_capital_micros: round_to_micros(args.initial_capital),
        contribution_amount_micros: round_to_micros(args.contribution_amount),
        contribution_frequency: args.contribution_frequency.into(),
        fee_bps_micros: round_to_micros(args.fee_bps),
        fee_fixed_micros: round_to_micros(args.fee_fixed),
        slippage_bps_micros: round_to_micros(args.slippage_bps),
        max_trade_participation_micros: round_to_micros(args.max_trade_participation),
        credit_dividends: args.credit_dividends,
        price_series_mode: args.price_series_mode.into(),
        seed: args.seed,
        strategies,
    };

    let warnings =
        sim_config::validate_simulation_config(&config, args.allow_dividend_double_count)?;
    for w in &warnings {
        tracing::warn!("{w}");
    }

    let source = sim_marketdata::MarketDataSource::open(
        Path::new(&args.data_path),
        args.engine.into(),
        config.price_series_mode,
        config.start_date,
        config.end_date,
    )?;
    let source = ProgressSource::new(source, args.progress);
    let ingest_warnings_handle = source.warnings_handle();

    let should_cancel = || false;
    let outcome: SimulationOutcome = if args.parallel {
        sim_engine::run_parallel(&config, source, &should_cancel)?
    } else {
        sim_engine::run(&config, source, &should_cancel)?
    };
    let ingest_warnings = ingest_warnings_handle.get();

    if outcome.cancelled {
        tracing::warn!("run cancelled before reaching end_date; writing partial artifacts");
    }

    let annual = sim_metrics::compute_annual_summaries(
        &outcome.daily_records,
        config.initial_capital_micros,
    );
    let terminal = sim_metrics::compute_terminal_summaries(
        &outcome.daily_records,
        &outcome.fills,
        config.initial_capital_micros,
    );

    let output_dir = Path::new(&args.output_dir);
    std::fs::create_dir_all(output_dir)?;

    output::write_daily_equity(output_dir, &outcome.daily_records)?;
    output::write_trades(output_dir, &outcome.fills)?;
    output::write_annual_summary(output_dir, &annual)?;
    output::write_terminal_summary(output_dir, &terminal)?;

    let manifest = RunManifest {
        config: ManifestConfig {
            start_date: config.start_date.to_string(),
            end_date: config.end_date.to_string(),
            initial_capital: args.initial_capital,
            contribution_amount: args.contribution_amount,
            fee_bps: args.fee_bps,
            fee_fixed: args.fee_fixed,
            slippage_bps: args.slippage_bps,
            max_trade_participation: args.max_trade_participation,
            credit_dividends: config.credit_dividends,
            price_series_mode: format!("{:?}", config.price_series_mode),
            strategy_ids: config
                .strategies
                .iter()
                .map(|s| s.strategy_id.clone())
                .collect(),
        },
        seed: args.seed,
        dataset_path: args.data_path.clone(),
        total_rows_seen: ingest_warnings.total_rows_seen,
        invalid_bars_dropped: ingest_warnings.invalid_bars_dropped,
        software_version: env!("CARGO_PKG_VERSION").to_string(),
        wall_time_seconds: started.elapsed().as_secs_f64(),
        warnings: warnings.iter().map(|w| w.to_string()).collect(),
        cancelled: outcome.cancelled,
    };
    output::write_run_manifest(output_dir, &manifest)?;

    Ok(())
}
