//! The five personality archetypes.
//!
//! RULE: `Archetype::ALL` is the canonical order. The resolver's tie-break
//! and the candidate hash both walk this order, so it must never be
//! reordered.

use crate::error::MatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Obsidian,
    Radiant,
    Blueprint,
    Kinetic,
    Sentimental,
}

impl Archetype {
    /// Canonical declaration order.
    pub const ALL: [Archetype; 5] = [
        Archetype::Obsidian,
        Archetype::Radiant,
        Archetype::Blueprint,
        Archetype::Kinetic,
        Archetype::Sentimental,
    ];

    /// The stable key used in shared links and data files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Obsidian    => "obsidian",
            Self::Radiant     => "radiant",
            Self::Blueprint   => "blueprint",
            Self::Kinetic     => "kinetic",
            Self::Sentimental => "sentimental",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Obsidian    => "Obsidian Introvert",
            Self::Radiant     => "Radiant Companion",
            Self::Blueprint   => "Blueprint Architect",
            Self::Kinetic     => "Kinetic Maverick",
            Self::Sentimental => "Sentimental Sincerist",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key)
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Archetype {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| MatchError::UnknownArchetype { key: s.to_string() })
    }
}
