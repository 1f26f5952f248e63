use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use sim_marketdata::EngineMode;
use sim_types::PriceSeriesMode;

/// Deterministic historical portfolio strategy simulator.
#[derive(Parser, Debug)]
#[command(name = "simrun")]
#[command(about = "Replay historical OHLCV data through one or more strategy plugins", long_about = None)]
pub struct Args {
    /// Path to the historical OHLCV CSV (§6 schema: Date,Ticker,Open,High,Low,Close,Volume,Dividends,Stock Splits).
    #[arg(long)]
    pub data_path: String,

    /// First date of the simulation window, inclusive.
    #[arg(long)]
    pub start_date: NaiveDate,

    /// Last date of the simulation window, inclusive.
    #[arg(long)]
    pub end_date: NaiveDate,

    /// Starting cash for every strategy, in dollars.
    #[arg(long)]
    pub initial_capital: f64,

    /// Default periodic cash contribution, in dollars. Overridable per strategy.
    #[arg(long, default_value_t = 0.0)]
    pub contribution_amount: f64,

    /// Default contribution cadence. Overridable per strategy.
    #[arg(long, value_enum, default_value = "none")]
    pub contribution_frequency: CliContributionFrequency,

    /// Proportional trading fee, in basis points of gross trade value.
    #[arg(long, default_value_t = 0.0)]
    pub fee_bps: f64,

    /// Flat per-trade fee, in dollars.
    #[arg(long, default_value_t = 0.0)]
    pub fee_fixed: f64,

    /// Proportional slippage, in basis points of gross trade value.
    #[arg(long, default_value_t = 0.0)]
    pub slippage_bps: f64,

    /// Maximum fraction of a day's dollar volume a single fill may consume.
    #[arg(long, default_value_t = 0.01)]
    pub max_trade_participation: f64,

    /// Credit cash dividends on held positions at close.
    #[arg(long, default_value_t = false)]
    pub credit_dividends: bool,

    /// Whether prices are fed as-is (possibly already adjusted) or
    /// reconstructed from raw OHLC plus dividends/splits.
    #[arg(long, value_enum, default_value = "as_is")]
    pub price_series_mode: CliPriceSeriesMode,

    /// Allows `--credit-dividends` together with `--price-series-mode as_is`
    /// without the dividend-double-count warning aborting validation-level
    /// tooling that treats warnings as errors.
    #[arg(long, default_value_t = false)]
    pub allow_dividend_double_count: bool,

    /// Path to the strategy config file (JSON or YAML; see §6).
    #[arg(long)]
    pub strategy_file: String,

    /// Directory the four CSV artifacts and the run manifest are written to.
    #[arg(long)]
    pub output_dir: String,

    /// Base RNG seed; combined with each strategy's own `random_seed` (if any).
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Market-data ingestion strategy.
    #[arg(long, value_enum, default_value = "streaming")]
    pub engine: CliEngineMode,

    /// Run each configured strategy on its own thread instead of lockstep on one.
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Emit a progress line to stderr after each trading year processed.
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum CliContributionFrequency {
    None,
    Daily,
    Monthly,
    Yearly,
}

impl From<CliContributionFrequency> for sim_types::ContributionFrequency {
    fn from(v: CliContributionFrequency) -> Self {
        match v {
            CliContributionFrequency::None => sim_types::ContributionFrequency::None,
            CliContributionFrequency::Daily => sim_types::ContributionFrequency::Daily,
            CliContributionFrequency::Monthly => sim_types::ContributionFrequency::Monthly,
            CliContributionFrequency::Yearly => sim_types::ContributionFrequency::Yearly,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum CliPriceSeriesMode {
    AsIs,
    RawReconstructed,
}

impl From<CliPriceSeriesMode> for PriceSeriesMode {
    fn from(v: CliPriceSeriesMode) -> Self {
        match v {
            CliPriceSeriesMode::AsIs => PriceSeriesMode::AsIs,
            CliPriceSeriesMode::RawReconstructed => PriceSeriesMode::RawReconstructed,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum CliEngineMode {
    Streaming,
    InMemory,
}

impl From<CliEngineMode> for EngineMode {
    fn from(v: CliEngineMode) -> Self {
        match v {
            CliEngineMode::Streaming => EngineMode::Streaming,
            CliEngineMode::InMemory => EngineMode::InMemory,
        }
    }
}
