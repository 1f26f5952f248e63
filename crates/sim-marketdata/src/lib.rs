//! Market Data Source (C1): streams per-date `MarketSnapshot`s from a large
//! tabular CSV, validating schema and computing the rolling 252-day
//! dollar-volume feature in a single forward pass.

mod error;
mod reconstruct;
mod rolling;
mod row;
mod source;

pub use error::{DataError, IngestWarnings};
pub use source::{EngineMode, MarketDataSource};
