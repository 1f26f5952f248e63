use std::fmt;

use sim_types::SimExitKind;

/// §4.2/§7: negative cash and a held position with no prior close are both
/// fatal engine errors — they indicate a bug upstream (C3 should never hand
/// the portfolio an infeasible fill), not a recoverable data condition.
#[derive(Debug, Clone)]
pub enum PortfolioError {
    NegativeCash {
        attempted_debit_micros: i64,
        available_micros: i64,
    },
    MissingPriorClose {
        symbol: String,
    },
    AccountingInvariantViolation {
        cash_micros: i64,
        positions_market_value_micros: i64,
        claimed_total_equity_micros: i64,
        diff_micros: i64,
    },
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortfolioError::NegativeCash {
                attempted_debit_micros,
                available_micros,
            } => write!(
                f,
                "negative cash: attempted to debit {attempted_debit_micros} against {available_micros} available"
            ),
            PortfolioError::MissingPriorClose { symbol } => {
                write!(f, "held position {symbol} has no prior close to mark against")
            }
            PortfolioError::AccountingInvariantViolation {
                cash_micros,
                positions_market_value_micros,
                claimed_total_equity_micros,
                diff_micros,
            } => write!(
                f,
                "accounting identity violated: cash={cash_micros} + positions_mv={positions_market_value_micros} != total_equity={claimed_total_equity_micros} (diff={diff_micros})"
            ),
        }
    }
}

impl std::error::Error for PortfolioError {}

impl PortfolioError {
    pub fn exit_kind(&self) -> SimExitKind {
        SimExitKind::RuntimeError
    }
}
