use std::collections::BTreeMap;

use sim_types::{micros_to_f64, round_to_micros, MarketBar};

/// Un-applies forward dividend reinvestment from a total-return-style close
/// series, producing a price-only close per bar.
///
/// Walks each symbol's bars newest-to-oldest starting at multiplier 1.0;
/// crossing an ex-dividend date multiplies the running factor by
/// `(1 - dividend/close)`, which is then applied to every bar strictly
/// before that date. This requires the symbol's full history and cannot be
/// computed in a single forward streaming pass, so the source runs it as a
/// separate precompute pass before `raw_reconstructed` mode streams anything.
pub fn reconstruct_close_micros(bars_by_date_ascending: &[MarketBar]) -> Vec<i64> {
    let n = bars_by_date_ascending.len();
    let mut adjusted = vec![0i64; n];
    let mut multiplier = 1.0f64;
    for i in (0..n).rev() {
        let bar = &bars_by_date_ascending[i];
        let close = micros_to_f64(bar.close_micros);
        adjusted[i] = round_to_micros(close * multiplier);
        let dividend = micros_to_f64(bar.dividend_micros);
        if dividend > 0.0 && close > 0.0 {
            multiplier *= 1.0 - dividend / close;
        }
    }
    adjusted
}

/// Applies `reconstruct_close_micros` per symbol to a full in-memory bar set,
/// returning a `(symbol, date) -> price_only_close_micros` lookup table.
pub fn build_reconstruction_table(
    bars_by_symbol: &BTreeMap<String, Vec<MarketBar>>,
) -> BTreeMap<(String, chrono::NaiveDate), i64> {
    let mut table = BTreeMap::new();
    for (symbol, bars) in bars_by_symbol {
        let mut sorted = bars.clone();
        sorted.sort_by_key(|b| b.date);
        let adjusted = reconstruct_close_micros(&sorted);
        for (bar, close) in sorted.iter().zip(adjusted) {
            table.insert((symbol.clone(), bar.date), close);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(date: &str, close: f64, dividend: f64) -> MarketBar {
        MarketBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open_micros: round_to_micros(close),
            high_micros: round_to_micros(close),
            low_micros: round_to_micros(close),
            close_micros: round_to_micros(close),
            volume: 1000,
            dividend_micros: round_to_micros(dividend),
            split_ratio_micros: 1_000_000,
        }
    }

    #[test]
    fn no_dividends_leaves_close_unchanged() {
        let bars = vec![bar("2020-01-01", 100.0, 0.0), bar("2020-01-02", 110.0, 0.0)];
        let adjusted = reconstruct_close_micros(&bars);
        assert_eq!(adjusted, vec![round_to_micros(100.0), round_to_micros(110.0)]);
    }

    #[test]
    fn dividend_on_last_day_does_not_affect_earlier_days() {
        let bars = vec![bar("2020-01-01", 100.0, 0.0), bar("2020-01-02", 100.0, 1.0)];
        let adjusted = reconstruct_close_micros(&bars);
        assert_eq!(adjusted[1], round_to_micros(100.0));
        assert_eq!(adjusted[0], round_to_micros(100.0));
    }

    #[test]
    fn dividend_discounts_earlier_days() {
        let bars = vec![
            bar("2020-01-01", 100.0, 0.0),
            bar("2020-01-02", 100.0, 10.0),
            bar("2020-01-03", 100.0, 0.0),
        ];
        let adjusted = reconstruct_close_micros(&bars);
        assert_eq!(adjusted[2], round_to_micros(100.0));
        assert_eq!(adjusted[1], round_to_micros(100.0));
        assert_eq!(adjusted[0], round_to_micros(90.0));
    }
}
