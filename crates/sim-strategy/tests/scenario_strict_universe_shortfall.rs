use chrono::NaiveDate;
use sim_strategy::StrategyPlugin;
use sim_types::{MarketBar, MarketSnapshot, RankMetric, WeightModel};

fn snapshot_with_n_symbols(date: NaiveDate, n: usize) -> MarketSnapshot {
    let mut snap = MarketSnapshot::new(date);
    for i in 0..n {
        snap.bars.insert(
            format!("SYM{i:03}"),
            MarketBar {
                date,
                open_micros: 10_000_000,
                high_micros: 10_100_000,
                low_micros: 9_900_000,
                close_micros: 10_000_000 + i as i64,
                volume: 1_000,
                dividend_micros: 0,
                split_ratio_micros: 1_000_000,
            },
        );
    }
    snap
}

#[test]
fn strict_mode_fails_when_the_universe_is_smaller_than_n() {
    let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let snap = snapshot_with_n_symbols(date, 3);

    let plugin = StrategyPlugin::TopNRanked {
        n: 10,
        metric: RankMetric::ClosePrice,
        weight_model: WeightModel::Equal,
        strict: true,
    };

    let err = plugin.on_rebalance(date, &snap).unwrap_err();
    assert_eq!(err.have, 3);
    assert_eq!(err.need, 10);
}

#[test]
fn lenient_mode_allocates_to_the_smaller_universe_instead_of_failing() {
    let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let snap = snapshot_with_n_symbols(date, 3);

    let plugin = StrategyPlugin::TopNRanked {
        n: 10,
        metric: RankMetric::ClosePrice,
        weight_model: WeightModel::Equal,
        strict: false,
    };

    let alloc = plugin.on_rebalance(date, &snap).unwrap();
    assert_eq!(alloc.weights_micros.len(), 3);
}

#[test]
fn bottom_n_ranked_picks_the_lowest_metric_values() {
    let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let snap = snapshot_with_n_symbols(date, 10);

    let plugin = StrategyPlugin::BottomNRanked {
        n: 2,
        metric: RankMetric::ClosePrice,
        weight_model: WeightModel::Equal,
        strict: true,
    };

    let alloc = plugin.on_rebalance(date, &snap).unwrap();
    assert!(alloc.weights_micros.contains_key("SYM000"));
    assert!(alloc.weights_micros.contains_key("SYM001"));
    assert_eq!(alloc.weights_micros.len(), 2);
}
