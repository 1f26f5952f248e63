/// Per-run (or per-strategy, via `StrategyConfig.execution` override) cost
/// parameters. `*_bps_micros` fields carry the basis-point value scaled by
/// `MICROS_SCALE`, e.g. 5 bps == `5_000_000`; dividing by `10_000` then
/// yields the fraction in the same micros scale as everything else.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionParams {
    pub fee_bps_micros: i64,
    pub fee_fixed_micros: i64,
    pub slippage_bps_micros: i64,
    pub max_trade_participation_micros: i64,
}
