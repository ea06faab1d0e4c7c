//! Presentation snapshot — what a renderer needs to draw one frame.
//!
//! A snapshot is a value, detached from the engine. Renderers hold on to
//! it freely; the engine never looks at it again.

use crate::{
    catalog::{Direction, MatchCandidate, Question},
    codec::SessionResult,
    event::Phase,
    score::ScoreVector,
    types::{EntityId, Millis, Seed, SessionId},
};
use serde::{Deserialize, Serialize};

/// The quip shown after an answer. Display only; never read by scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commentary {
    pub question_id: EntityId,
    pub direction:   Direction,
    pub label:       String,
    pub text:        String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub text:      String,
    pub posted_at: Millis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id:        SessionId,
    pub phase:             Phase,
    pub run_seed:          Seed,
    pub progress_index:    usize,
    pub question_count:    usize,
    pub current_question:  Option<Question>,
    /// The card under the current one.
    pub next_question:     Option<Question>,
    pub scores:            ScoreVector,
    pub commentary:        Option<Commentary>,
    pub notification:      Option<Notification>,
    pub result:            Option<SessionResult>,
    pub matched_candidate: Option<MatchCandidate>,
    /// When the next timer fires, if any.
    pub next_timer_due:    Option<Millis>,
}
