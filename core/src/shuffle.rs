//! Seeded question ordering.

use crate::{rng::SeededRng, types::Seed};

/// Reproducible Fisher–Yates permutation of `items`.
/// The input slice is left untouched; the permutation is built on a copy.
pub fn shuffle<T: Clone>(items: &[T], seed: Seed) -> Vec<T> {
    let mut rng = SeededRng::new(seed);
    let mut copy = items.to_vec();
    for i in (1..copy.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64).floor() as usize;
        copy.swap(i, j);
    }
    copy
}

/// Shuffle the full bank and keep the first `count` entries.
/// Returns the whole shuffled bank when it holds fewer than `count`.
pub fn select<T: Clone>(bank: &[T], seed: Seed, count: usize) -> Vec<T> {
    let mut picked = shuffle(bank, seed);
    picked.truncate(count);
    picked
}
