use std::collections::HashSet;
use std::fs;
use std::path::Path;

use sim_types::StrategyConfig;

use crate::error::ConfigError;

/// Loads the strategy config file (§6): a top-level JSON or YAML array of
/// `StrategyConfig`. Format is dispatched from the file extension, matching
/// the corpus's parse-then-validate shape, simplified here to one file — a
/// single strategy list needs no base/env/engine layering. Unknown fields
/// on any strategy entry are a hard parse failure (`serde(deny_unknown_fields)`
/// on every config struct in `sim-types`), satisfying §4.4's "fails fast...
/// for unknown fields".
pub fn load_strategy_file(path: &Path) -> Result<Vec<StrategyConfig>, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        msg: e.to_string(),
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let strategies: Vec<StrategyConfig> = match extension.as_str() {
        "json" => serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            msg: e.to_string(),
        })?,
        "yaml" | "yml" => serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            msg: e.to_string(),
        })?,
        other => {
            return Err(ConfigError::UnsupportedExtension {
                path: path.display().to_string(),
                extension: other.to_string(),
            })
        }
    };

    if strategies.is_empty() {
        return Err(ConfigError::Empty);
    }

    let mut seen = HashSet::with_capacity(strategies.len());
    for sc in &strategies {
        if !seen.insert(sc.strategy_id.clone()) {
            return Err(ConfigError::DuplicateStrategyId(sc.strategy_id.clone()));
        }
    }

    Ok(strategies)
}
