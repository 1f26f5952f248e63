use chrono::NaiveDate;
use sim_strategy::StrategyPlugin;
use sim_types::{MarketBar, MarketSnapshot, MICROS_SCALE};

/// A synthetic universe of 600 symbols with strictly increasing rolling
/// dollar volume (SYM599 the most liquid); sp500_proxy must select exactly
/// the top 500 by that feature and weight them proportionally to it.
fn synthetic_universe(date: NaiveDate) -> MarketSnapshot {
    let mut snap = MarketSnapshot::new(date);
    for i in 0..600i128 {
        let sym = format!("SYM{i:03}");
        snap.bars.insert(
            sym.clone(),
            MarketBar {
                date,
                open_micros: 10_000_000,
                high_micros: 10_100_000,
                low_micros: 9_900_000,
                close_micros: 10_000_000,
                volume: 1_000,
                dividend_micros: 0,
                split_ratio_micros: 1_000_000,
            },
        );
        snap.rolling_dollar_volume_252d
            .insert(sym, (i + 1) * 1_000_000_000);
    }
    snap
}

#[test]
fn selects_exactly_the_top_500_by_rolling_dollar_volume() {
    let date = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
    let snap = synthetic_universe(date);

    let alloc = StrategyPlugin::Sp500Proxy.on_rebalance(date, &snap).unwrap();

    assert_eq!(alloc.weights_micros.len(), 500);
    assert!(alloc.weights_micros.contains_key("SYM599"));
    assert!(alloc.weights_micros.contains_key("SYM100"));
    assert!(!alloc.weights_micros.contains_key("SYM099"));
}

#[test]
fn weights_are_proportional_to_the_ranking_metric_and_sum_to_one() {
    let date = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
    let snap = synthetic_universe(date);

    let alloc = StrategyPlugin::Sp500Proxy.on_rebalance(date, &snap).unwrap();

    let w_most_liquid = alloc.weights_micros["SYM599"];
    let w_least_liquid = alloc.weights_micros["SYM100"];
    assert!(w_most_liquid > w_least_liquid);

    let sum: i64 = alloc.weights_micros.values().sum();
    assert!((sum - MICROS_SCALE).abs() <= 500);
}

#[test]
fn untradable_symbols_are_excluded_even_if_liquid() {
    let date = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
    let mut snap = synthetic_universe(date);
    snap.bars.get_mut("SYM599").unwrap().close_micros = 0;

    let alloc = StrategyPlugin::Sp500Proxy.on_rebalance(date, &snap).unwrap();

    assert!(!alloc.weights_micros.contains_key("SYM599"));
    assert!(alloc.weights_micros.contains_key("SYM099"));
}
