//! Fate Matcher core — a personality-quiz matching engine.
//!
//! Leaves first: `rng` and `shuffle` order the questions, `score` folds
//! answers into a ScoreVector and resolves the dominant archetype,
//! `compatibility` and `candidate` turn that into a result, `codec` moves
//! results in and out of shared links, and `engine` drives one session
//! through its phases.

pub mod archetype;
pub mod candidate;
pub mod catalog;
pub mod clock;
pub mod codec;
pub mod command;
pub mod compatibility;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod rng;
pub mod score;
pub mod share;
pub mod shuffle;
pub mod snapshot;
pub mod types;
