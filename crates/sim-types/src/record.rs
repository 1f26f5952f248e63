use chrono::NaiveDate;

/// One strategy's snapshot of its own book at the close of one trading day.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub strategy_id: String,
    pub cash_micros: i64,
    pub positions_market_value_micros: i64,
    pub total_equity_micros: i64,
    /// `NaN` only on the very first record if `prev_total_equity == 0`; the
    /// spec calls this "undefined" rather than zero.
    pub daily_return: f64,
    pub cumulative_return: f64,
    pub contribution_cumulative_micros: i64,
    pub trade_count_day: u32,
    pub turnover_day: f64,
}
