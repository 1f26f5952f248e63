use serde::Deserialize;

/// One strategy's configuration, as loaded from the strategy config file
/// (§6): a JSON/YAML array of these. `plugin` is validated against the known
/// plugin set by `sim-strategy::StrategyPlugin::from_name`, not here — this
/// crate carries no plugin-dispatch logic.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfig {
    pub strategy_id: String,
    pub plugin: String,
    #[serde(default)]
    pub universe: UniverseSpec,
    #[serde(default)]
    pub weights: WeightModel,
    pub rebalance: RebalanceSpec,
    #[serde(default)]
    pub contributions: Option<ContributionOverride>,
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default)]
    pub execution: Option<ExecutionOverride>,
}

/// Plugin-agnostic universe parameters. Each plugin reads only the fields it
/// needs (e.g. `equal_weight` reads `filter`, `top_n_ranked` reads `n` and
/// `metric`); unused fields left `None` are simply ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniverseSpec {
    pub n: Option<u32>,
    pub symbols: Option<Vec<String>>,
    pub filter: Option<Vec<String>>,
    pub metric: Option<RankMetric>,
    /// `true` = fail the run when the tradable universe is smaller than `n`;
    /// `false` (default) = allocate to the smaller universe.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightModel {
    #[default]
    Equal,
    MetricProportional,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RebalanceSpec {
    pub frequency: RebalanceFrequency,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceFrequency {
    Daily,
    Monthly,
    Yearly,
    Never,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContributionOverride {
    pub amount: f64,
    pub frequency: ContributionFrequency,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContributionFrequency {
    None,
    Daily,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RankMetric {
    ClosePrice,
    DollarVolume1d,
    RollingDollarVolume252d,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionOverride {
    pub fee_bps: Option<f64>,
    pub fee_fixed: Option<f64>,
    pub slippage_bps: Option<f64>,
    pub max_trade_participation: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceSeriesMode {
    AsIs,
    RawReconstructed,
}

/// Global run parameters, assembled by `sim-cli` from CLI flags plus the
/// loaded `Vec<StrategyConfig>`. Not itself deserialized from the strategy
/// config file — only the per-strategy list is.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub initial_capital_micros: i64,
    pub contribution_amount_micros: i64,
    pub contribution_frequency: ContributionFrequency,
    pub fee_bps_micros: i64,
    pub fee_fixed_micros: i64,
    pub slippage_bps_micros: i64,
    pub max_trade_participation_micros: i64,
    pub credit_dividends: bool,
    pub price_series_mode: PriceSeriesMode,
    pub seed: u64,
    pub strategies: Vec<StrategyConfig>,
}
