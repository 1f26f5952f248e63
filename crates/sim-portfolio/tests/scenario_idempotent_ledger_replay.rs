use chrono::NaiveDate;
use sim_portfolio::{apply_fill, credit_cash, recompute_from_ledger, PortfolioState};
use sim_types::{Side, TradeFill};

fn fill(date: &str, symbol: &str, side: Side, shares: i64, price: i64) -> TradeFill {
    let gross = shares * price / 1_000_000;
    let net = match side {
        Side::Buy => -gross,
        Side::Sell => gross,
    };
    TradeFill {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        strategy_id: "s1".to_string(),
        symbol: symbol.to_string(),
        side,
        shares_micros: shares,
        executed_price_micros: price,
        gross_value_micros: gross,
        slippage_cost_micros: 0,
        fee_cost_micros: 0,
        net_cash_impact_micros: net,
    }
}

#[test]
fn replaying_the_ledger_from_scratch_matches_incremental_state() {
    let mut pf = PortfolioState::new(10_000_000_000);
    credit_cash(&mut pf, 1_000_000_000);
    apply_fill(&mut pf, &fill("2020-01-02", "AAA", Side::Buy, 10_000_000, 100_000_000)).unwrap();
    apply_fill(&mut pf, &fill("2020-01-03", "AAA", Side::Sell, 4_000_000, 110_000_000)).unwrap();

    let replayed = recompute_from_ledger(10_000_000_000, &pf.ledger).unwrap();

    assert_eq!(replayed.cash_micros, pf.cash_micros);
    assert_eq!(
        replayed.positions.get("AAA").map(|p| p.qty_micros),
        pf.positions.get("AAA").map(|p| p.qty_micros)
    );
}

#[test]
fn selling_all_shares_removes_the_position() {
    let mut pf = PortfolioState::new(1_000_000_000);
    apply_fill(&mut pf, &fill("2020-01-02", "AAA", Side::Buy, 5_000_000, 100_000_000)).unwrap();
    apply_fill(&mut pf, &fill("2020-01-03", "AAA", Side::Sell, 5_000_000, 100_000_000)).unwrap();
    assert!(!pf.positions.contains_key("AAA"));
}

#[test]
fn a_fill_that_would_make_cash_negative_is_rejected() {
    let mut pf = PortfolioState::new(100_000_000);
    let result = apply_fill(&mut pf, &fill("2020-01-02", "AAA", Side::Buy, 10_000_000, 100_000_000));
    assert!(result.is_err());
}
