//! Randomness, split in two.
//!
//! RULE: Anything that must be reproducible (the question shuffle) draws
//! from a SeededRng built from the run seed. Cosmetic noise (compatibility
//! fuzz) draws from a Jitter source and is never reproducible in
//! production. The two never share a generator, so tests can pin either
//! one without touching the other.

use crate::types::{Millis, Seed};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::VecDeque;

/// A deterministic generator for a single run.
pub struct SeededRng {
    seed:  Seed,
    inner: Pcg64Mcg,
}

impl SeededRng {
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Where run seeds come from. Called once at construction and once per
/// reset.
pub trait SeedSource {
    fn next_seed(&mut self, now: Millis) -> Seed;
}

/// Seeds each run from the current time, as a fresh page load would.
#[derive(Debug, Default)]
pub struct ClockSeeds;

impl SeedSource for ClockSeeds {
    fn next_seed(&mut self, now: Millis) -> Seed {
        now
    }
}

/// A scripted list of seeds, for tests and replays. Once exhausted it keeps
/// returning the last seed it handed out.
#[derive(Debug)]
pub struct FixedSeeds {
    queue: VecDeque<Seed>,
    last:  Seed,
}

impl FixedSeeds {
    pub fn new(seeds: impl IntoIterator<Item = Seed>) -> Self {
        Self { queue: seeds.into_iter().collect(), last: 0 }
    }
}

impl SeedSource for FixedSeeds {
    fn next_seed(&mut self, _now: Millis) -> Seed {
        if let Some(seed) = self.queue.pop_front() {
            self.last = seed;
        }
        self.last
    }
}

/// Source of cosmetic noise.
pub trait Jitter {
    /// A value uniformly drawn from [lo, hi).
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;
}

/// Thread-local OS-seeded randomness.
#[derive(Debug, Default)]
pub struct AmbientJitter;

impl Jitter for AmbientJitter {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + rand::thread_rng().gen::<f64>() * (hi - lo)
    }
}

/// Always returns the same offset, clamped into [lo, hi].
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        self.0.clamp(lo, hi)
    }
}
