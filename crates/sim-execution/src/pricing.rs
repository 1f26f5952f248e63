use sim_types::{Side, MICROS_SCALE};

use crate::params::ExecutionParams;

/// §4.3 point 3: `executed_price = close * (1 + sign * slippage_bps/10_000)`,
/// sign +1 for buy, -1 for sell.
pub fn apply_slippage(close_micros: i64, side: Side, params: &ExecutionParams) -> i64 {
    let sign: i64 = match side {
        Side::Buy => 1,
        Side::Sell => -1,
    };
    let frac_micros = sign * (params.slippage_bps_micros / 10_000);
    (close_micros as i128 * (MICROS_SCALE as i128 + frac_micros as i128) / MICROS_SCALE as i128)
        as i64
}

/// §4.3 point 4: `fee_cost = gross_value * fee_bps/10_000 + fee_fixed`.
pub fn apply_fees(gross_value_micros: i64, params: &ExecutionParams) -> i64 {
    let fee_frac_micros = params.fee_bps_micros / 10_000;
    let proportional =
        (gross_value_micros as i128 * fee_frac_micros as i128 / MICROS_SCALE as i128) as i64;
    proportional + params.fee_fixed_micros
}
