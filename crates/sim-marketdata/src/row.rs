use std::collections::HashMap;

use chrono::NaiveDate;
use sim_types::{round_to_micros, MarketBar};

use crate::error::DataError;

pub const REQUIRED_COLUMNS: &[&str] = &[
    "date",
    "ticker",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "dividends",
    "stock splits",
];

/// Case-insensitive, order-independent column lookup built once from the
/// header row, matching the corpus's `ingest_csv.rs::build_col_index`.
pub struct ColumnIndex {
    index: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn build(header: &csv::StringRecord) -> Result<Self, DataError> {
        let mut index = HashMap::new();
        for (i, raw) in header.iter().enumerate() {
            index.insert(raw.trim().to_ascii_lowercase(), i);
        }
        for required in REQUIRED_COLUMNS {
            if !index.contains_key(*required) {
                return Err(DataError::MissingColumn((*required).to_string()));
            }
        }
        Ok(Self { index })
    }

    fn field<'a>(&self, record: &'a csv::StringRecord, name: &str) -> &'a str {
        let i = self.index[name];
        record.get(i).unwrap_or("").trim()
    }
}

/// Outcome of parsing one CSV data row.
pub enum ParsedRow {
    /// Structurally and semantically valid: `close > 0` and the date parsed.
    Valid { symbol: String, bar: MarketBar },
    /// Structurally fine but semantically invalid (e.g. `close <= 0`):
    /// counted as a dropped bar, not an error.
    Invalid,
}

/// Parses one data row. Returns `Err` only for structural failures (a field
/// that isn't numeric at all, or a date that doesn't match `YYYY-MM-DD`);
/// a merely non-positive close is `Ok(ParsedRow::Invalid)`, per §4.1's
/// "valid iff close > 0 and the date parses".
pub fn parse_row(
    cols: &ColumnIndex,
    record: &csv::StringRecord,
    line: u64,
) -> Result<ParsedRow, DataError> {
    let date_raw = cols.field(record, "date");
    let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d").map_err(|_| {
        DataError::UnparseableDate {
            line,
            raw: date_raw.to_string(),
        }
    })?;

    let symbol = cols.field(record, "ticker").to_string();

    let open = parse_f64(cols, record, "open", line)?;
    let high = parse_f64(cols, record, "high", line)?;
    let low = parse_f64(cols, record, "low", line)?;
    let close = parse_f64(cols, record, "close", line)?;
    let volume = parse_f64(cols, record, "volume", line)?;
    let dividends = parse_f64(cols, record, "dividends", line)?;
    let split_raw = cols.field(record, "stock splits");
    let split_ratio = if split_raw.is_empty() || split_raw == "0" {
        1.0
    } else {
        parse_f64(cols, record, "stock splits", line)?
    };

    if close <= 0.0 {
        return Ok(ParsedRow::Invalid);
    }

    let bar = MarketBar {
        date,
        open_micros: round_to_micros(open),
        high_micros: round_to_micros(high),
        low_micros: round_to_micros(low),
        close_micros: round_to_micros(close),
        volume: volume.round() as i64,
        dividend_micros: round_to_micros(dividends.max(0.0)),
        split_ratio_micros: round_to_micros(if split_ratio > 0.0 { split_ratio } else { 1.0 }),
    };

    Ok(ParsedRow::Valid { symbol, bar })
}

fn parse_f64(
    cols: &ColumnIndex,
    record: &csv::StringRecord,
    field: &str,
    line: u64,
) -> Result<f64, DataError> {
    let raw = cols.field(record, field);
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>().map_err(|_| DataError::NonNumericField {
        line,
        field: field.to_string(),
        raw: raw.to_string(),
    })
}
