//! Metrics & Reporter (C7): derives annual summaries and terminal
//! comparative metrics purely from `DailyRecord`s and the trade ledger — no
//! recourse to raw market data, per §4.7.

mod annual;
mod stats;
mod terminal;

pub use annual::{compute_annual_summaries, AnnualSummary};
pub use terminal::{compute_terminal_summaries, TerminalSummary};
