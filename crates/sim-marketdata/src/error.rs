use std::fmt;

use sim_types::SimExitKind;

/// Fail-fast structural errors: a missing required column, or a field that
/// does not parse as its declared type at all. These abort before the
/// engine starts (§7 DataError).
#[derive(Debug, Clone)]
pub enum DataError {
    MissingColumn(String),
    UnparseableDate { line: u64, raw: String },
    NonNumericField { line: u64, field: String, raw: String },
    Io(String),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::MissingColumn(name) => write!(f, "missing required column: {name}"),
            DataError::UnparseableDate { line, raw } => {
                write!(f, "line {line}: unparseable date {raw:?}")
            }
            DataError::NonNumericField { line, field, raw } => {
                write!(f, "line {line}: field {field} is not numeric: {raw:?}")
            }
            DataError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for DataError {}

impl DataError {
    pub fn exit_kind(&self) -> SimExitKind {
        SimExitKind::DataError
    }
}

/// Counted, non-fatal ingestion statistics surfaced in the run manifest.
/// Each field corresponds to the §7 "DataWarning" kind: the row parsed
/// structurally but was semantically invalid, so it was dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestWarnings {
    pub invalid_bars_dropped: u64,
    pub total_rows_seen: u64,
}
