use sim_types::{PriceSeriesMode, SimulationConfig, MICROS_SCALE};

use crate::error::{ConfigError, ConfigWarning};

/// Validates run parameters that cut across the whole `SimulationConfig`,
/// as opposed to the per-plugin checks `sim-strategy::StrategyPlugin::
/// validate_config` performs. Returns the non-fatal warnings to surface in
/// the run manifest; returns `Err` for anything that should abort the run
/// before any market data is opened (§4.4, §7).
pub fn validate_simulation_config(
    cfg: &SimulationConfig,
    allow_dividend_double_count: bool,
) -> Result<Vec<ConfigWarning>, ConfigError> {
    if cfg.start_date > cfg.end_date {
        return Err(ConfigError::InvalidRange {
            field: "start_date/end_date",
            detail: format!(
                "start_date {} is after end_date {}",
                cfg.start_date, cfg.end_date
            ),
        });
    }

    if cfg.initial_capital_micros < 0 {
        return Err(ConfigError::InvalidValue {
            field: "initial_capital",
            detail: "must be non-negative".to_string(),
        });
    }

    if cfg.contribution_amount_micros < 0 {
        return Err(ConfigError::InvalidValue {
            field: "contribution_amount",
            detail: "must be non-negative".to_string(),
        });
    }

    if cfg.fee_bps_micros < 0 {
        return Err(ConfigError::InvalidValue {
            field: "fee_bps",
            detail: "must be non-negative".to_string(),
        });
    }

    if cfg.fee_fixed_micros < 0 {
        return Err(ConfigError::InvalidValue {
            field: "fee_fixed",
            detail: "must be non-negative".to_string(),
        });
    }

    if cfg.slippage_bps_micros < 0 {
        return Err(ConfigError::InvalidValue {
            field: "slippage_bps",
            detail: "must be non-negative".to_string(),
        });
    }

    if cfg.max_trade_participation_micros < 0 || cfg.max_trade_participation_micros > MICROS_SCALE {
        return Err(ConfigError::InvalidRange {
            field: "max_trade_participation",
            detail: "must lie within [0.0, 1.0]".to_string(),
        });
    }

    if cfg.strategies.is_empty() {
        return Err(ConfigError::Empty);
    }

    let mut warnings = Vec::new();
    if cfg.credit_dividends
        && cfg.price_series_mode == PriceSeriesMode::AsIs
        && !allow_dividend_double_count
    {
        warnings.push(ConfigWarning::DividendDoubleCountRisk);
    }

    Ok(warnings)
}
