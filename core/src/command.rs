use crate::{catalog::Direction, types::{EntityId, Millis}};
use serde::{Deserialize, Serialize};

/// Everything the presentation layer can ask of a session.
/// Variants may be added — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum SessionCommand {
    // ── Phase control ─────────────────────────────
    Start,
    Reset,

    // ── Quiz ──────────────────────────────────────
    /// `question_id` names the card the player acted on. When present, an
    /// answer for any other card is rejected.
    Answer {
        direction: Direction,
        #[serde(default)]
        question_id: Option<EntityId>,
    },
    DismissCommentary,

    // ── Sharing ───────────────────────────────────
    /// An incoming shared link: full URL, `?query` or bare query.
    OpenLink { query: String },
    DismissNotification,
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start                  => "start",
            Self::Reset                  => "reset",
            Self::Answer { .. }          => "answer",
            Self::DismissCommentary      => "dismiss_commentary",
            Self::OpenLink { .. }        => "open_link",
            Self::DismissNotification    => "dismiss_notification",
        }
    }
}

/// A command stamped with the time it arrived. Used by replays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedCommand {
    pub at:      Millis,
    pub command: SessionCommand,
}
