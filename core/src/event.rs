//! Session events — the record of everything a session did.
//!
//! RULE: Every state change the engine makes is announced as a
//! SessionEvent and appended to the session journal. Two sessions fed the
//! same seeds, jitter and commands produce identical journals.

use crate::{
    catalog::Direction,
    clock::TimerId,
    codec::SessionResult,
    score::ScoreVector,
    types::{EntityId, Millis, Seed},
};
use serde::{Deserialize, Serialize};

/// Exactly one phase is active per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intro,
    Quiz,
    Simulating,
    Result,
}

impl Phase {
    /// Phases in which an incoming link may replace the current state.
    pub fn accepts_links(&self) -> bool {
        matches!(self, Self::Intro | Self::Result)
    }
}

/// Why an answer was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AnswerRejection {
    /// Not in the quiz phase.
    WrongPhase { phase: Phase },
    /// Another answer was accepted less than one cool-down ago.
    CoolingDown { until: Millis },
    /// The named question was already answered in this run.
    AlreadyAnswered { question_id: EntityId },
    /// The named question is not the current one.
    NotCurrentQuestion { question_id: EntityId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    // ── Lifecycle ──────────────────────────────────
    SessionStarted {
        seed: Seed,
        question_ids: Vec<EntityId>,
    },
    SessionReset {
        next_seed: Seed,
        from: Phase,
    },
    CommandIgnored {
        command: String,
        phase: Phase,
    },

    // ── Quiz ───────────────────────────────────────
    AnswerAccepted {
        question_id: EntityId,
        index: usize,
        direction: Direction,
        label: String,
        commentary: String,
        scores: ScoreVector,
    },
    AnswerRejected {
        rejection: AnswerRejection,
    },
    CommentaryDismissed,

    // ── Simulation ─────────────────────────────────
    SimulationScheduled {
        timer_id: TimerId,
        due_at: Millis,
    },
    SimulationCancelled {
        timer_id: TimerId,
    },
    ResultComputed {
        result: SessionResult,
        scores: ScoreVector,
        ratio: f64,
    },

    // ── Links and sharing ──────────────────────────
    LinkApplied {
        result: SessionResult,
    },
    LinkIgnored {
        reason: String,
    },
    NotificationPosted {
        text: String,
    },
    NotificationExpired,
}

impl SessionEvent {
    /// Stable name used for the journal's event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. }      => "session_started",
            Self::SessionReset { .. }        => "session_reset",
            Self::CommandIgnored { .. }      => "command_ignored",
            Self::AnswerAccepted { .. }      => "answer_accepted",
            Self::AnswerRejected { .. }      => "answer_rejected",
            Self::CommentaryDismissed        => "commentary_dismissed",
            Self::SimulationScheduled { .. } => "simulation_scheduled",
            Self::SimulationCancelled { .. } => "simulation_cancelled",
            Self::ResultComputed { .. }      => "result_computed",
            Self::LinkApplied { .. }         => "link_applied",
            Self::LinkIgnored { .. }         => "link_ignored",
            Self::NotificationPosted { .. }  => "notification_posted",
            Self::NotificationExpired        => "notification_expired",
        }
    }
}

/// One journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub seq:        u64,
    pub at:         Millis,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SessionEvent
}
