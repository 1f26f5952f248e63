use std::cell::Cell;
use std::rc::Rc;

use sim_marketdata::{IngestWarnings, MarketDataSource};
use sim_types::MarketSnapshot;

/// Wraps `MarketDataSource` to print one stderr line per calendar year
/// crossed, when `--progress` is set. Implemented as an iterator adapter
/// rather than a callback threaded through `sim-engine::run`, so the
/// engine's signature stays untouched by a CLI-only concern.
///
/// Also mirrors the source's running `IngestWarnings` into a shared cell on
/// every pulled item, since `sim_engine::run`/`run_parallel` consume the
/// source by value — the streaming engine mode only finishes accumulating
/// warnings as the iterator is drained, so the orchestrator needs a handle
/// that survives past the point the source itself is dropped inside the
/// engine.
pub struct ProgressSource {
    inner: MarketDataSource,
    enabled: bool,
    last_year: Option<i32>,
    warnings: Rc<Cell<IngestWarnings>>,
}

impl ProgressSource {
    pub fn new(inner: MarketDataSource, enabled: bool) -> Self {
        let warnings = Rc::new(Cell::new(inner.warnings()));
        Self {
            inner,
            enabled,
            last_year: None,
            warnings,
        }
    }

    /// A handle that keeps reflecting ingestion warnings as the source is
    /// drained, usable after the source itself has been moved into the engine.
    pub fn warnings_handle(&self) -> Rc<Cell<IngestWarnings>> {
        Rc::clone(&self.warnings)
    }
}

impl Iterator for ProgressSource {
    type Item = MarketSnapshot;

    fn next(&mut self) -> Option<MarketSnapshot> {
        let snapshot = self.inner.next()?;
        self.warnings.set(self.inner.warnings());
        if self.enabled {
            use chrono::Datelike;
            let year = snapshot.date.year();
            if self.last_year != Some(year) {
                eprintln!("progress: entering {year}");
                self.last_year = Some(year);
            }
        }
        Some(snapshot)
    }
}
