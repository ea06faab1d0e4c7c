//! Score accumulation and archetype resolution.
//!
//! RULE: A ScoreVector is never mutated in place by the engine.
//! Every answer produces a new vector via `accumulate`.

use crate::archetype::Archetype;
use serde::{Deserialize, Serialize};

/// One number per archetype. Used both for running scores and for an
/// option's weight contribution. Absent keys in data files deserialize to 0,
/// so a sparse weight map becomes a full five-entry record. Unknown keys
/// are a load error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreVector {
    pub obsidian:    f64,
    pub radiant:     f64,
    pub blueprint:   f64,
    pub kinetic:     f64,
    pub sentimental: f64,
}

/// Per-option weight contribution. Same shape as a score vector.
pub type Weights = ScoreVector;

impl ScoreVector {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, archetype: Archetype) -> f64 {
        match archetype {
            Archetype::Obsidian    => self.obsidian,
            Archetype::Radiant     => self.radiant,
            Archetype::Blueprint   => self.blueprint,
            Archetype::Kinetic     => self.kinetic,
            Archetype::Sentimental => self.sentimental,
        }
    }

    /// Builder-style setter, mostly for tests and fixtures.
    pub fn with(mut self, archetype: Archetype, value: f64) -> Self {
        match archetype {
            Archetype::Obsidian    => self.obsidian = value,
            Archetype::Radiant     => self.radiant = value,
            Archetype::Blueprint   => self.blueprint = value,
            Archetype::Kinetic     => self.kinetic = value,
            Archetype::Sentimental => self.sentimental = value,
        }
        self
    }

    /// Values in canonical archetype order.
    pub fn iter(&self) -> impl Iterator<Item = (Archetype, f64)> + '_ {
        Archetype::ALL.into_iter().map(move |a| (a, self.get(a)))
    }
}

/// Fold one answer's weights into the running total.
pub fn accumulate(previous: &ScoreVector, contribution: &Weights) -> ScoreVector {
    ScoreVector {
        obsidian:    previous.obsidian + contribution.obsidian,
        radiant:     previous.radiant + contribution.radiant,
        blueprint:   previous.blueprint + contribution.blueprint,
        kinetic:     previous.kinetic + contribution.kinetic,
        sentimental: previous.sentimental + contribution.sentimental,
    }
}

/// The dominant archetype. Walks canonical order and only replaces the
/// current best on a strictly greater value, so the earliest archetype
/// wins any tie.
pub fn resolve(scores: &ScoreVector) -> Archetype {
    let mut best = Archetype::ALL[0];
    let mut best_value = scores.get(best);
    for (archetype, value) in scores.iter() {
        if value > best_value {
            best = archetype;
            best_value = value;
        }
    }
    best
}
