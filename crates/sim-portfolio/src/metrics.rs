use sim_types::MICROS_SCALE;

use crate::error::PortfolioError;
use crate::types::PortfolioState;
use crate::EPS_MICROS;

/// Pure (non-mutating) recomputation of positions market value from the
/// state's own `last_close_micros` fields, for the accounting-identity
/// check to compare against `positions_market_value_micros` independently
/// of whatever `mark_to_market` last wrote.
pub fn compute_positions_market_value_micros(pf: &PortfolioState) -> i64 {
    let total: i128 = pf
        .positions
        .values()
        .map(|p| p.qty_micros as i128 * p.last_close_micros as i128 / MICROS_SCALE as i128)
        .sum();
    total.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// §8's universal invariant: `total_equity = cash + Σ shares·close`, to
/// within `eps_micros`. Fatal (`AccountingInvariantViolation`) if violated.
pub fn check_accounting_identity(
    pf: &PortfolioState,
    eps_micros: i64,
) -> Result<(), PortfolioError> {
    let recomputed_mv = compute_positions_market_value_micros(pf);
    let claimed_total_equity = pf.total_equity_micros();
    let recomputed_total_equity = pf.cash_micros + recomputed_mv;
    let diff = (claimed_total_equity - recomputed_total_equity).abs();
    if diff > eps_micros.max(EPS_MICROS) {
        return Err(PortfolioError::AccountingInvariantViolation {
            cash_micros: pf.cash_micros,
            positions_market_value_micros: recomputed_mv,
            claimed_total_equity_micros: claimed_total_equity,
            diff_micros: diff,
        });
    }
    Ok(())
}
