use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use sim_types::{MarketSnapshot, PriceSeriesMode};

use crate::error::{DataError, IngestWarnings};
use crate::reconstruct::build_reconstruction_table;
use crate::rolling::RollingDollarVolume;
use crate::row::{parse_row, ColumnIndex, ParsedRow};

const ROLLING_WINDOW: usize = 252;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineMode {
    /// Assumes the CSV is already in ascending date order on disk; emits a
    /// snapshot as soon as a date change is detected, keeping memory
    /// proportional to the active symbol count.
    Streaming,
    /// Buffers the whole dataset keyed by date first, tolerating any row
    /// order on disk. Uses more memory but accepts unsorted input.
    InMemory,
}

type ReconstructionTable = BTreeMap<(String, NaiveDate), i64>;

/// Lazy, finite, non-restartable, ascending-date sequence of `MarketSnapshot`s
/// for `[start_date, end_date]` intersected with the dataset's dates. Single
/// consumer: once iterated, it cannot be restarted.
pub struct MarketDataSource {
    start_date: NaiveDate,
    end_date: NaiveDate,
    rolling: RollingDollarVolume,
    warnings: IngestWarnings,
    reconstruction: Option<ReconstructionTable>,
    state: State,
}

enum State {
    Streaming {
        reader: csv::Reader<File>,
        cols: ColumnIndex,
        next_line: u64,
        pending: Option<(NaiveDate, String, sim_types::MarketBar)>,
        done: bool,
    },
    InMemory {
        dates: std::vec::IntoIter<(NaiveDate, Vec<(String, sim_types::MarketBar)>)>,
    },
}

impl MarketDataSource {
    pub fn open(
        path: &Path,
        mode: EngineMode,
        price_series_mode: PriceSeriesMode,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, DataError> {
        let mut warnings = IngestWarnings::default();

        let reconstruction = if price_series_mode == PriceSeriesMode::RawReconstructed {
            let rows = read_all_rows(path, &mut IngestWarnings::default())?;
            let mut by_symbol: BTreeMap<String, Vec<sim_types::MarketBar>> = BTreeMap::new();
            for (symbol, bar) in rows {
                by_symbol.entry(symbol).or_default().push(bar);
            }
            Some(build_reconstruction_table(&by_symbol))
        } else {
            None
        };

        let state = match mode {
            EngineMode::Streaming => {
                // The streaming iterator below can't return `Result` (its
                // `Item` is `MarketSnapshot`), so a structural error hit
                // mid-file while it's draining would otherwise just look
                // like end-of-stream. Validate the whole file structurally
                // up front instead, to honor §7's "fail fast on the first
                // offending row" for `DataError` even in streaming mode.
                // `raw_reconstructed` mode already pays this pass via
                // `read_all_rows` above, so skip the duplicate work there.
                if reconstruction.is_none() {
                    validate_structural(path)?;
                }
                let mut reader = open_reader(path)?;
                let header = reader.headers().map_err(|e| DataError::Io(e.to_string()))?;
                let cols = ColumnIndex::build(header)?;
                State::Streaming {
                    reader,
                    cols,
                    next_line: 2,
                    pending: None,
                    done: false,
                }
            }
            EngineMode::InMemory => {
                let rows = read_all_rows(path, &mut warnings)?;
                let mut by_date: BTreeMap<NaiveDate, Vec<(String, sim_types::MarketBar)>> =
                    BTreeMap::new();
                for (symbol, bar) in rows {
                    by_date.entry(bar.date).or_default().push((symbol, bar));
                }
                for bars in by_date.values_mut() {
                    bars.sort_by(|a, b| a.0.cmp(&b.0));
                }
                State::InMemory {
                    dates: by_date.into_iter().collect::<Vec<_>>().into_iter(),
                }
            }
        };

        Ok(Self {
            start_date,
            end_date,
            rolling: RollingDollarVolume::new(ROLLING_WINDOW),
            warnings,
            reconstruction,
            state,
        })
    }

    pub fn warnings(&self) -> IngestWarnings {
        self.warnings
    }

    fn finalize_snapshot(
        &mut self,
        date: NaiveDate,
        mut bars: Vec<(String, sim_types::MarketBar)>,
    ) -> MarketSnapshot {
        bars.sort_by(|a, b| a.0.cmp(&b.0));
        let mut snapshot = MarketSnapshot::new(date);
        for (symbol, mut bar) in bars {
            if let Some(table) = &self.reconstruction {
                if let Some(&adjusted) = table.get(&(symbol.clone(), date)) {
                    bar.close_micros = adjusted;
                }
            }
            let dollar_volume = bar.dollar_volume_micros();
            if let Some(sum) = self.rolling.observe(&symbol, dollar_volume) {
                snapshot.rolling_dollar_volume_252d.insert(symbol.clone(), sum);
            }
            snapshot.bars.insert(symbol, bar);
        }
        snapshot
    }
}

impl Iterator for MarketDataSource {
    type Item = MarketSnapshot;

    fn next(&mut self) -> Option<MarketSnapshot> {
        loop {
            let (date, bars) = match &mut self.state {
                State::InMemory { dates } => match dates.next() {
                    Some(pair) => pair,
                    None => return None,
                },
                State::Streaming {
                    reader,
                    cols,
                    next_line,
                    pending,
                    done,
                } => {
                    if *done {
                        return None;
                    }
                    let mut current_date: Option<NaiveDate> = pending.as_ref().map(|p| p.0);
                    let mut bars: Vec<(String, sim_types::MarketBar)> = Vec::new();
                    if let Some((d, s, b)) = pending.take() {
                        current_date = Some(d);
                        bars.push((s, b));
                    }

                    let mut record = csv::StringRecord::new();
                    loop {
                        match reader.read_record(&mut record) {
                            Ok(true) => {
                                let line = *next_line;
                                *next_line += 1;
                                match parse_row(cols, &record, line) {
                                    Ok(ParsedRow::Valid { symbol, bar }) => {
                                        match current_date {
                                            None => {
                                                current_date = Some(bar.date);
                                                bars.push((symbol, bar));
                                            }
                                            Some(d) if d == bar.date => {
                                                bars.push((symbol, bar));
                                            }
                                            Some(_) => {
                                                *pending = Some((bar.date, symbol, bar));
                                                break;
                                            }
                                        }
                                    }
                                    Ok(ParsedRow::Invalid) => {
                                        self.warnings.invalid_bars_dropped += 1;
                                        tracing::warn!(line, "dropped invalid bar (close <= 0)");
                                    }
                                    Err(_) => {
                                        // Unreachable in practice: `open()` already ran
                                        // `validate_structural` over this same file, so every
                                        // row here has already parsed once. Kept as a safe
                                        // fallback (end-of-stream, not a panic) since `next()`
                                        // has no `Result` to propagate a fresh error through.
                                        *done = true;
                                        return None;
                                    }
                                }
                                self.warnings.total_rows_seen += 1;
                            }
                            Ok(false) => {
                                *done = true;
                                break;
                            }
                            Err(_) => {
                                *done = true;
                                return None;
                            }
                        }
                    }
                    match current_date {
                        Some(d) => (d, bars),
                        None => return None,
                    }
                }
            };

            if date < self.start_date {
                continue;
            }
            if date > self.end_date {
                return None;
            }
            return Some(self.finalize_snapshot(date, bars));
        }
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>, DataError> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| DataError::Io(e.to_string()))
}

/// Single pass over the file that only checks for structural failures (a
/// non-numeric field, an unparseable date) without retaining any rows —
/// O(1) memory, unlike `read_all_rows`. A merely invalid bar (`close <= 0`)
/// is not an error here either, matching `parse_row`'s own contract.
fn validate_structural(path: &Path) -> Result<(), DataError> {
    let mut reader = open_reader(path)?;
    let header = reader.headers().map_err(|e| DataError::Io(e.to_string()))?.clone();
    let cols = ColumnIndex::build(&header)?;
    let mut record = csv::StringRecord::new();
    let mut line = 2u64;
    while reader
        .read_record(&mut record)
        .map_err(|e| DataError::Io(e.to_string()))?
    {
        parse_row(&cols, &record, line)?;
        line += 1;
    }
    Ok(())
}

fn read_all_rows(
    path: &Path,
    warnings: &mut IngestWarnings,
) -> Result<Vec<(String, sim_types::MarketBar)>, DataError> {
    let mut reader = open_reader(path)?;
    let header = reader.headers().map_err(|e| DataError::Io(e.to_string()))?.clone();
    let cols = ColumnIndex::build(&header)?;
    let mut out = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut line = 2u64;
    while reader
        .read_record(&mut record)
        .map_err(|e| DataError::Io(e.to_string()))?
    {
        match parse_row(&cols, &record, line)? {
            ParsedRow::Valid { symbol, bar } => out.push((symbol, bar)),
            ParsedRow::Invalid => {
                warnings.invalid_bars_dropped += 1;
                tracing::warn!(line, "dropped invalid bar (close <= 0)");
            }
        }
        warnings.total_rows_seen += 1;
        line += 1;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "sim-marketdata-source-test-{}-{}.csv",
            std::process::id(),
            contents.len()
        ));
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn streaming_mode_fails_fast_on_a_non_numeric_field_instead_of_truncating() {
        let path = write_temp(
            "Date,Ticker,Open,High,Low,Close,Volume,Dividends,Stock Splits\n\
             2020-01-02,AAA,100,100,100,100,1000,0,1\n\
             2020-01-03,AAA,not_a_number,100,100,100,1000,0,1\n",
        );
        let err = MarketDataSource::open(
            &path,
            EngineMode::Streaming,
            PriceSeriesMode::AsIs,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::NonNumericField { line: 3, .. }));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn streaming_mode_emits_every_valid_snapshot_when_the_file_is_well_formed() {
        let path = write_temp(
            "Date,Ticker,Open,High,Low,Close,Volume,Dividends,Stock Splits\n\
             2020-01-02,AAA,100,100,100,100,1000,0,1\n\
             2020-01-03,AAA,101,101,101,101,1000,0,1\n",
        );
        let source = MarketDataSource::open(
            &path,
            EngineMode::Streaming,
            PriceSeriesMode::AsIs,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        )
        .unwrap();
        let snapshots: Vec<_> = source.collect();
        assert_eq!(snapshots.len(), 2);
        let _ = std::fs::remove_file(&path);
    }
}
