use std::fmt;

use chrono::NaiveDate;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// One executed trade. `net_cash_impact_micros = sign*gross_value_micros -
/// (slippage_cost_micros + fee_cost_micros)`, sign negative for buys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradeFill {
    pub date: NaiveDate,
    pub strategy_id: String,
    pub symbol: String,
    pub side: Side,
    pub shares_micros: i64,
    pub executed_price_micros: i64,
    pub gross_value_micros: i64,
    pub slippage_cost_micros: i64,
    pub fee_cost_micros: i64,
    pub net_cash_impact_micros: i64,
}
