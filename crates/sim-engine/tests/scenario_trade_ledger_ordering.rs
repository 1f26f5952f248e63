use chrono::NaiveDate;
use sim_types::{
    ContributionFrequency, MarketBar, MarketSnapshot, PriceSeriesMode, RebalanceFrequency,
    RebalanceSpec, SimulationConfig, StrategyConfig, UniverseSpec, WeightModel,
};

fn two_symbol_snapshot(date: NaiveDate) -> MarketSnapshot {
    let mut snap = MarketSnapshot::new(date);
    for symbol in ["AAA", "ZZZ"] {
        snap.bars.insert(
            symbol.to_string(),
            MarketBar {
                date,
                open_micros: 100_000_000,
                high_micros: 100_000_000,
                low_micros: 100_000_000,
                close_micros: 100_000_000,
                volume: 1_000_000,
                dividend_micros: 0,
                split_ratio_micros: 1_000_000,
            },
        );
    }
    snap
}

fn strategy(strategy_id: &str) -> StrategyConfig {
    StrategyConfig {
        strategy_id: strategy_id.to_string(),
        plugin: "equal_weight".to_string(),
        universe: UniverseSpec::default(),
        weights: WeightModel::Equal,
        rebalance: RebalanceSpec { frequency: RebalanceFrequency::Never },
        contributions: None,
        random_seed: None,
        execution: None,
    }
}

/// §5 requires the trade ledger to be ordered `(date, strategy_id, symbol)`
/// regardless of the order strategies are declared in the config. Declaring
/// "zeta" before "alpha" here would, without the engine's final sort, put
/// zeta's fills first in the ledger for every date they share.
#[test]
fn ledger_is_sorted_by_date_then_strategy_id_then_symbol_not_config_order() {
    let start = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let snapshots: Vec<_> = (0..3)
        .map(|i| two_symbol_snapshot(start + chrono::Duration::days(i)))
        .collect();

    let config = SimulationConfig {
        start_date: start,
        end_date: start + chrono::Duration::days(2),
        initial_capital_micros: 10_000 * sim_types::MICROS_SCALE,
        contribution_amount_micros: 0,
        contribution_frequency: ContributionFrequency::None,
        fee_bps_micros: 0,
        fee_fixed_micros: 0,
        slippage_bps_micros: 0,
        max_trade_participation_micros: sim_types::MICROS_SCALE,
        credit_dividends: false,
        price_series_mode: PriceSeriesMode::AsIs,
        seed: 0,
        strategies: vec![strategy("zeta_strategy"), strategy("alpha_strategy")],
    };

    let outcome = sim_engine::run(&config, snapshots, &|| false).unwrap();

    assert_eq!(outcome.fills.len(), 4, "two symbols x two strategies, one rebalance day");

    let mut expected = outcome.fills.clone();
    expected.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.strategy_id.cmp(&b.strategy_id))
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    assert_eq!(
        outcome.fills.iter().map(|f| (f.date, f.strategy_id.clone(), f.symbol.clone())).collect::<Vec<_>>(),
        expected.iter().map(|f| (f.date, f.strategy_id.clone(), f.symbol.clone())).collect::<Vec<_>>(),
        "fills must already be in (date, strategy_id, symbol) order"
    );
    assert_eq!(outcome.fills[0].strategy_id, "alpha_strategy", "alpha sorts before zeta despite being declared second");
    assert_eq!(outcome.fills[1].strategy_id, "alpha_strategy");
    assert_eq!(outcome.fills[0].symbol, "AAA");
    assert_eq!(outcome.fills[1].symbol, "ZZZ");
}

/// An invalid `StrategyConfig` reaching `sim_engine::run` (library callers
/// don't all pre-validate the way `sim-cli` does) must surface as
/// `ConfigError` (exit 1), not get mistaken for a `DataError` (exit 2).
#[test]
fn an_unknown_plugin_surfaces_as_a_config_error_not_a_data_error() {
    let start = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let snapshots = vec![two_symbol_snapshot(start)];

    let mut bad_strategy = strategy("broken");
    bad_strategy.plugin = "not_a_real_plugin".to_string();

    let config = SimulationConfig {
        start_date: start,
        end_date: start,
        initial_capital_micros: 10_000 * sim_types::MICROS_SCALE,
        contribution_amount_micros: 0,
        contribution_frequency: ContributionFrequency::None,
        fee_bps_micros: 0,
        fee_fixed_micros: 0,
        slippage_bps_micros: 0,
        max_trade_participation_micros: sim_types::MICROS_SCALE,
        credit_dividends: false,
        price_series_mode: PriceSeriesMode::AsIs,
        seed: 0,
        strategies: vec![bad_strategy],
    };

    let err = sim_engine::run(&config, snapshots, &|| false).unwrap_err();
    assert!(matches!(err, sim_engine::EngineError::Config(_)));
    assert_eq!(err.exit_kind(), sim_types::SimExitKind::ConfigError);
}
