//! Session time — clock sources and one-shot timers.
//!
//! The engine never reads the time itself. Callers pass `now` into every
//! command and into `advance_to`, so a ManualClock replays a session
//! exactly and a WallClock drives a live one.

use crate::types::Millis;
use serde::{Deserialize, Serialize};

pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct WallClock;

impl Clock for WallClock {
    fn now_ms(&self) -> Millis {
        chrono::Utc::now().timestamp_millis().max(0) as Millis
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManualClock {
    now: Millis,
}

impl ManualClock {
    pub fn starting_at(now: Millis) -> Self {
        Self { now }
    }

    /// Move forward by `ms`. Returns the new time.
    pub fn advance(&mut self, ms: Millis) -> Millis {
        self.now = self.now.saturating_add(ms);
        self.now
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now
    }
}

pub type TimerId = u64;

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// End of the simulating phase.
    Simulation,
    /// Auto-dismiss of the current notification.
    Notification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub id:     TimerId,
    pub kind:   TimerKind,
    pub due_at: Millis,
}

/// Pending one-shot timers. Ids are never reused within a queue, so a
/// cancelled timer can never be confused with a later one.
#[derive(Debug, Default, Clone)]
pub struct TimerQueue {
    next_id: TimerId,
    pending: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, due_at: Millis) -> TimerId {
        self.next_id += 1;
        let id = self.next_id;
        self.pending.push(Timer { id, kind, due_at });
        log::debug!("timer {id} scheduled: {kind:?} due at {due_at}");
        id
    }

    /// Returns true if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        let cancelled = self.pending.len() != before;
        if cancelled {
            log::debug!("timer {id} cancelled");
        }
        cancelled
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    /// Remove and return every timer due at or before `now`, earliest
    /// first; equal due times fire in scheduling order.
    pub fn drain_due(&mut self, now: Millis) -> Vec<Timer> {
        let (mut due, rest): (Vec<Timer>, Vec<Timer>) =
            self.pending.drain(..).partition(|t| t.due_at <= now);
        self.pending = rest;
        due.sort_by_key(|t| (t.due_at, t.id));
        due
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.pending.iter().map(|t| t.due_at).min()
    }
}
