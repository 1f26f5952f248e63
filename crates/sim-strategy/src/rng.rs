use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Derives a fresh, deterministic `ChaCha8Rng` for one rebalance date from
/// `(strategy_seed, date)`. Mixed into one 64-bit seed via a simple
/// multiply-xor so that inserting a new date or reordering strategies never
/// perturbs another date's stream — each date's generator is independent,
/// not advanced from the previous one.
pub fn rng_for_date(strategy_seed: u64, date: NaiveDate) -> ChaCha8Rng {
    let ordinal = date.num_days_from_ce() as u64;
    let mixed = strategy_seed
        .wrapping_mul(0x9E3779B97F4A7C15)
        .wrapping_add(ordinal.wrapping_mul(0xBF58476D1CE4E5B9));
    ChaCha8Rng::seed_from_u64(mixed)
}
