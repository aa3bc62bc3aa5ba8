//! Randomized fetch order.
//!
//! Symbols are downloaded in a different order on every run so the upstream is
//! not hit in the same sequence each time. The shuffle is seeded from the
//! wall clock at one-second resolution; it spreads load, nothing more.

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use quote_common::Symbol;

/// Shuffle `symbols` in place, seeded from the current Unix second.
pub fn shuffle_symbols(symbols: &mut [Symbol]) {
    let seed = Utc::now().timestamp() as u64;
    shuffle_with_seed(symbols, seed);
}

/// Fisher–Yates shuffle of `items` driven by a generator seeded with `seed`.
pub fn shuffle_with_seed<T>(items: &mut [T], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);
}
