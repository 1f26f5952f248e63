use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::micros::MICROS_SCALE;

/// A single (date, symbol) observation. All price/volume fields are micros.
///
/// Invariant: `low_micros <= open_micros, close_micros <= high_micros` when all
/// are present and positive; enforced by `sim-marketdata` at ingestion, not
/// here, since a `MarketBar` may also be hand-built by test fixtures that
/// don't care about OHLC consistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketBar {
    pub date: NaiveDate,
    pub open_micros: i64,
    pub high_micros: i64,
    pub low_micros: i64,
    pub close_micros: i64,
    pub volume: i64,
    pub dividend_micros: i64,
    pub split_ratio_micros: i64,
}

impl MarketBar {
    pub fn dollar_volume_micros(&self) -> i128 {
        self.close_micros as i128 * self.volume as i128
    }
}

/// All bars observed on one date, keyed by symbol, plus derived per-symbol
/// features computed by the market data source (currently just the rolling
/// 252-day dollar-volume sum). `None` means the feature has fewer than 252
/// observations yet ("NaN, excluded from rank selectors").
///
/// `BTreeMap` keeps iteration in lexicographic symbol order everywhere a
/// snapshot is walked, which is load-bearing for deterministic tie-breaks.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    pub date: NaiveDate,
    pub bars: BTreeMap<String, MarketBar>,
    pub rolling_dollar_volume_252d: BTreeMap<String, i128>,
}

impl MarketSnapshot {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            bars: BTreeMap::new(),
            rolling_dollar_volume_252d: BTreeMap::new(),
        }
    }

    pub fn is_tradable(&self, symbol: &str) -> bool {
        self.bars
            .get(symbol)
            .map(|b| b.close_micros > 0)
            .unwrap_or(false)
    }

    pub fn close_micros(&self, symbol: &str) -> Option<i64> {
        self.bars.get(symbol).map(|b| b.close_micros)
    }
}

/// Post-rebalance desired per-symbol weight vector. Weights are micros-of-one
/// (`1_000_000` == weight 1.0); the remainder (`1_000_000 - sum`) stays cash.
/// Empty is legal and means "hold 100% cash".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetAllocation {
    pub weights_micros: BTreeMap<String, i64>,
}

impl TargetAllocation {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sum_micros(&self) -> i64 {
        self.weights_micros.values().sum()
    }

    /// Every weight in `[0, 1]` and the sum in `[0, 1 + eps]`.
    pub fn is_within_bounds(&self, eps_micros: i64) -> bool {
        self.weights_micros
            .values()
            .all(|&w| (0..=MICROS_SCALE).contains(&w))
            && self.sum_micros() <= MICROS_SCALE + eps_micros
    }
}
