//! Shared primitive types used across the entire engine.

/// Wall or manual time in milliseconds. All timers and debounce windows
/// are expressed in this unit.
pub type Millis = u64;

/// A run seed. One per quiz run; drives the question shuffle.
pub type Seed = u64;

/// A stable, unique identifier for a question or a match candidate.
pub type EntityId = String;

/// The canonical session identifier.
pub type SessionId = String;

/// Number of questions in a session's active set.
pub const DEFAULT_QUESTION_COUNT: usize = 5;
