use chrono::NaiveDate;
use rand::seq::SliceRandom;
use sim_types::{MarketSnapshot, RankMetric, StrategyConfig, TargetAllocation, WeightModel, MICROS_SCALE};

use crate::error::{RebalanceError, StrategyConfigError};
use crate::rng::rng_for_date;

/// The closed v1 plugin set. Each variant carries exactly the parameters
/// that plugin reads from `StrategyConfig.universe`/`.weights`.
#[derive(Debug, Clone)]
pub enum StrategyPlugin {
    Sp500Proxy,
    EqualWeight { filter: Option<Vec<String>> },
    ExplicitSymbols { symbols: Vec<String> },
    RandomN { n: u32, strategy_seed: u64 },
    TopNRanked { n: u32, metric: RankMetric, weight_model: WeightModel, strict: bool },
    BottomNRanked { n: u32, metric: RankMetric, weight_model: WeightModel, strict: bool },
}

const SP500_N: usize = 500;

impl StrategyPlugin {
    /// Parses and validates a `StrategyConfig` into a plugin instance.
    /// Fails fast with a structured error for unknown fields, non-positive
    /// `N`, an unknown rank metric, or a missing symbol list — before any
    /// data is opened.
    pub fn from_config(cfg: &StrategyConfig) -> Result<Self, StrategyConfigError> {
        match cfg.plugin.as_str() {
            "sp500_proxy" => Ok(StrategyPlugin::Sp500Proxy),
            "equal_weight" => Ok(StrategyPlugin::EqualWeight {
                filter: cfg.universe.filter.clone(),
            }),
            "explicit_symbols" => {
                let symbols = cfg.universe.symbols.clone().ok_or_else(|| {
                    StrategyConfigError::MissingSymbols {
                        strategy_id: cfg.strategy_id.clone(),
                    }
                })?;
                if symbols.is_empty() {
                    return Err(StrategyConfigError::MissingSymbols {
                        strategy_id: cfg.strategy_id.clone(),
                    });
                }
                Ok(StrategyPlugin::ExplicitSymbols { symbols })
            }
            "random_n" => {
                let n = require_positive_n(cfg)?;
                let strategy_seed = cfg.random_seed.ok_or_else(|| {
                    StrategyConfigError::ContradictoryOverride {
                        strategy_id: cfg.strategy_id.clone(),
                        detail: "random_n requires random_seed".to_string(),
                    }
                })?;
                Ok(StrategyPlugin::RandomN { n, strategy_seed })
            }
            "top_n_ranked" => {
                let n = require_positive_n(cfg)?;
                let metric = cfg.universe.metric.ok_or_else(|| {
                    StrategyConfigError::UnknownRankMetric {
                        strategy_id: cfg.strategy_id.clone(),
                    }
                })?;
                Ok(StrategyPlugin::TopNRanked {
                    n,
                    metric,
                    weight_model: cfg.weights,
                    strict: cfg.universe.strict,
                })
            }
            "bottom_n_ranked" => {
                let n = require_positive_n(cfg)?;
                let metric = cfg.universe.metric.ok_or_else(|| {
                    StrategyConfigError::UnknownRankMetric {
                        strategy_id: cfg.strategy_id.clone(),
                    }
                })?;
                Ok(StrategyPlugin::BottomNRanked {
                    n,
                    metric,
                    weight_model: cfg.weights,
                    strict: cfg.universe.strict,
                })
            }
            other => Err(StrategyConfigError::UnknownPlugin(other.to_string())),
        }
    }

    pub fn validate_config(cfg: &StrategyConfig) -> Result<(), StrategyConfigError> {
        Self::from_config(cfg).map(|_| ())
    }

    /// Pure: reads only `date` and `snapshot`, never wall clock, files, or
    /// the network. The RNG used by `random_n` is re-derived per call from
    /// `(strategy_seed, date)`, not threaded in from outside, so the whole
    /// function stays a pure value -> value mapping.
    pub fn on_rebalance(
        &self,
        date: NaiveDate,
        snapshot: &MarketSnapshot,
    ) -> Result<TargetAllocation, RebalanceError> {
        match self {
            StrategyPlugin::Sp500Proxy => Ok(sp500_proxy(snapshot)),
            StrategyPlugin::EqualWeight { filter } => Ok(equal_weight(snapshot, filter.as_deref())),
            StrategyPlugin::ExplicitSymbols { symbols } => {
                Ok(explicit_symbols(snapshot, symbols))
            }
            StrategyPlugin::RandomN { n, strategy_seed } => {
                Ok(random_n(snapshot, *n, rng_for_date(*strategy_seed, date)))
            }
            StrategyPlugin::TopNRanked { n, metric, weight_model, strict } => {
                ranked("top_n_ranked", snapshot, *n, *metric, *weight_model, *strict, true)
            }
            StrategyPlugin::BottomNRanked { n, metric, weight_model, strict } => {
                ranked("bottom_n_ranked", snapshot, *n, *metric, *weight_model, *strict, false)
            }
        }
    }
}

fn require_positive_n(cfg: &StrategyConfig) -> Result<u32, StrategyConfigError> {
    match cfg.universe.n {
        Some(n) if n > 0 => Ok(n),
        Some(n) => Err(StrategyConfigError::NonPositiveN {
            strategy_id: cfg.strategy_id.clone(),
            n: n as i64,
        }),
        None => Err(StrategyConfigError::NonPositiveN {
            strategy_id: cfg.strategy_id.clone(),
            n: 0,
        }),
    }
}

fn equal_weights(symbols: &[String]) -> TargetAllocation {
    let mut alloc = TargetAllocation::empty();
    if symbols.is_empty() {
        return alloc;
    }
    let w = MICROS_SCALE / symbols.len() as i64;
    for s in symbols {
        alloc.weights_micros.insert(s.clone(), w);
    }
    alloc
}

fn sp500_proxy(snapshot: &MarketSnapshot) -> TargetAllocation {
    let mut ranked: Vec<(&String, i128)> = snapshot
        .rolling_dollar_volume_252d
        .iter()
        .filter(|(sym, _)| snapshot.is_tradable(sym))
        .map(|(sym, rdv)| (sym, *rdv))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(SP500_N);

    let total: i128 = ranked.iter().map(|(_, v)| *v).sum();
    let mut alloc = TargetAllocation::empty();
    if total <= 0 {
        return alloc;
    }
    for (sym, rdv) in &ranked {
        let w = (*rdv as i128 * MICROS_SCALE as i128 / total) as i64;
        alloc.weights_micros.insert((*sym).clone(), w);
    }
    alloc
}

fn equal_weight(snapshot: &MarketSnapshot, filter: Option<&[String]>) -> TargetAllocation {
    let universe: Vec<String> = match filter {
        Some(list) => list
            .iter()
            .filter(|s| snapshot.is_tradable(s))
            .cloned()
            .collect(),
        None => snapshot
            .bars
            .keys()
            .filter(|s| snapshot.is_tradable(s))
            .cloned()
            .collect(),
    };
    equal_weights(&universe)
}

fn explicit_symbols(snapshot: &MarketSnapshot, configured: &[String]) -> TargetAllocation {
    let universe: Vec<String> = configured
        .iter()
        .filter(|s| snapshot.is_tradable(s))
        .cloned()
        .collect();
    equal_weights(&universe)
}

fn random_n(snapshot: &MarketSnapshot, n: u32, mut rng: rand_chacha::ChaCha8Rng) -> TargetAllocation {
    let mut universe: Vec<String> = snapshot
        .bars
        .keys()
        .filter(|s| snapshot.is_tradable(s))
        .cloned()
        .collect();
    universe.sort();
    universe.shuffle(&mut rng);
    universe.truncate(n as usize);
    universe.sort();
    equal_weights(&universe)
}

fn metric_value(snapshot: &MarketSnapshot, symbol: &str, metric: RankMetric) -> Option<i128> {
    let bar = snapshot.bars.get(symbol)?;
    match metric {
        RankMetric::ClosePrice => Some(bar.close_micros as i128),
        RankMetric::DollarVolume1d => Some(bar.dollar_volume_micros()),
        RankMetric::RollingDollarVolume252d => {
            snapshot.rolling_dollar_volume_252d.get(symbol).copied()
        }
    }
}

fn ranked(
    plugin_name: &str,
    snapshot: &MarketSnapshot,
    n: u32,
    metric: RankMetric,
    weight_model: WeightModel,
    strict: bool,
    descending: bool,
) -> Result<TargetAllocation, RebalanceError> {
    let mut candidates: Vec<(String, i128)> = snapshot
        .bars
        .keys()
        .filter(|s| snapshot.is_tradable(s))
        .filter_map(|s| metric_value(snapshot, s, metric).map(|v| (s.clone(), v)))
        .collect();

    candidates.sort_by(|a, b| {
        let ord = if descending {
            b.1.cmp(&a.1)
        } else {
            a.1.cmp(&b.1)
        };
        ord.then_with(|| a.0.cmp(&b.0))
    });

    if candidates.len() < n as usize {
        if strict {
            return Err(RebalanceError {
                strategy_id: plugin_name.to_string(),
                have: candidates.len(),
                need: n,
            });
        }
        tracing::warn!(
            have = candidates.len(),
            need = n,
            plugin = plugin_name,
            "strategy universe smaller than requested N; allocating to smaller universe"
        );
    }
    candidates.truncate(n as usize);

    let mut alloc = TargetAllocation::empty();
    match weight_model {
        WeightModel::Equal => {
            let symbols: Vec<String> = candidates.into_iter().map(|(s, _)| s).collect();
            return Ok(equal_weights(&symbols));
        }
        WeightModel::MetricProportional => {
            let total: i128 = candidates.iter().map(|(_, v)| v.max(0)).sum();
            if total <= 0 {
                return Ok(alloc);
            }
            for (sym, v) in candidates {
                let w = (v.max(0) as i128 * MICROS_SCALE as i128 / total) as i64;
                alloc.weights_micros.insert(sym, w);
            }
        }
    }
    Ok(alloc)
}
