/// Fixed-point scale for all money, share, and weight quantities: `value_micros = value * 10^6`.
///
/// Mirrors the corpus's `MICROS_SCALE` convention. Integer arithmetic at this
/// scale is what makes byte-identical replay possible across platforms.
pub const MICROS_SCALE: i64 = 1_000_000;

/// Converts a micros-scaled integer to `f64`, for reporting and CSV output only.
/// Never use this to feed a value back into simulation arithmetic.
pub fn micros_to_f64(v: i64) -> f64 {
    v as f64 / MICROS_SCALE as f64
}

/// Converts a floating-point input value (e.g. a CLI flag) to micros, rounding
/// half-away-from-zero at the 6th decimal place.
pub fn round_to_micros(v: f64) -> i64 {
    (v * MICROS_SCALE as f64).round() as i64
}
