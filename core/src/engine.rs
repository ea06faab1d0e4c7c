//! The session engine — one quiz session's state machine.
//!
//! PHASES:
//!   intro --start--> quiz --answer xN--> simulating --timer--> result
//!   any   --reset--> intro
//!   intro | result --valid link--> result
//!
//! RULES:
//!   - The engine owns the only mutable state: phase, question set,
//!     score vector, result, timers.
//!   - The score vector is replaced on every accepted answer, never
//!     mutated in place.
//!   - Time comes in with every call. The engine never reads a clock.
//!   - Nothing here fails on bad input. Bad links, duplicate answers and
//!     integration failures degrade to "ignore" or "notify".
//!   - Every state change is recorded in the journal.

use crate::{
    candidate,
    catalog::{Catalog, Direction, Question},
    clock::{TimerId, TimerKind, TimerQueue},
    codec::{self, SessionResult},
    command::{SessionCommand, TimedCommand},
    compatibility,
    config::EngineConfig,
    error::MatchResult,
    event::{AnswerRejection, JournalEntry, Phase, SessionEvent},
    rng::{FixedJitter, FixedSeeds, Jitter, SeedSource},
    score::{self, ScoreVector},
    share::{self, ShareTarget},
    shuffle,
    snapshot::{Commentary, Notification, SessionSnapshot},
    types::{EntityId, Millis, Seed, SessionId},
};

pub struct SessionEngine {
    pub session_id: SessionId,
    config:         EngineConfig,
    catalog:        Catalog,
    seeds:          Box<dyn SeedSource>,
    jitter:         Box<dyn Jitter>,
    timers:         TimerQueue,

    phase:          Phase,
    run_seed:       Seed,
    questions:      Vec<Question>,
    index:          usize,
    scores:         ScoreVector,
    answered:       Vec<EntityId>,
    cooldown_until: Millis,
    result:         Option<SessionResult>,

    simulation_timer:   Option<TimerId>,
    notification_timer: Option<TimerId>,
    commentary:         Option<Commentary>,
    notification:       Option<Notification>,

    journal:        Vec<JournalEntry>,
    journal_seq:    u64,
}

impl SessionEngine {
    /// Build a session in the intro phase. The first run seed is drawn
    /// from `seeds` immediately.
    pub fn new(
        session_id: SessionId,
        config: EngineConfig,
        catalog: Catalog,
        mut seeds: Box<dyn SeedSource>,
        jitter: Box<dyn Jitter>,
        now: Millis,
    ) -> MatchResult<Self> {
        config.validate()?;
        catalog.validate()?;
        catalog.require_questions(config.question_count)?;

        let run_seed = seeds.next_seed(now);
        log::info!("session {session_id} created, run seed {run_seed}");

        Ok(Self {
            session_id,
            config,
            catalog,
            seeds,
            jitter,
            timers: TimerQueue::new(),
            phase: Phase::Intro,
            run_seed,
            questions: Vec::new(),
            index: 0,
            scores: ScoreVector::zero(),
            answered: Vec::new(),
            cooldown_until: 0,
            result: None,
            simulation_timer: None,
            notification_timer: None,
            commentary: None,
            notification: None,
            journal: Vec::new(),
            journal_seq: 0,
        })
    }

    /// Fully reproducible session for tests: scripted seeds and a fixed
    /// fuzz offset.
    pub fn build_test(session_id: SessionId, seeds: &[Seed], fuzz: f64) -> MatchResult<Self> {
        Self::build_test_with(session_id, EngineConfig::default(), Catalog::builtin()?, seeds, fuzz)
    }

    pub fn build_test_with(
        session_id: SessionId,
        config: EngineConfig,
        catalog: Catalog,
        seeds: &[Seed],
        fuzz: f64,
    ) -> MatchResult<Self> {
        Self::new(
            session_id,
            config,
            catalog,
            Box::new(FixedSeeds::new(seeds.iter().copied())),
            Box::new(FixedJitter(fuzz)),
            0,
        )
    }

    // ── Inputs ─────────────────────────────────────────────────

    /// Apply one command at time `now`. Timers due at or before `now` fire
    /// first, in due order.
    pub fn handle(&mut self, now: Millis, command: SessionCommand) -> MatchResult<Vec<SessionEvent>> {
        let mut events = self.advance_to(now)?;

        log::debug!("session {} phase={:?} cmd={}", self.session_id, self.phase, command.name());

        let emitted = match command {
            SessionCommand::Start => self.start(),
            SessionCommand::Reset => self.reset(now),
            SessionCommand::Answer { direction, question_id } => {
                self.answer(now, direction, question_id)
            }
            SessionCommand::DismissCommentary => match self.commentary.take() {
                Some(_) => vec![SessionEvent::CommentaryDismissed],
                None => vec![],
            },
            SessionCommand::OpenLink { query } => self.open_link(&query),
            SessionCommand::DismissNotification => self.expire_notification(),
        };

        self.record_all(now, &emitted)?;
        events.extend(emitted);
        Ok(events)
    }

    /// Fire every timer due at or before `now`.
    pub fn advance_to(&mut self, now: Millis) -> MatchResult<Vec<SessionEvent>> {
        let mut events = Vec::new();
        for timer in self.timers.drain_due(now) {
            let fired = match timer.kind {
                TimerKind::Simulation if self.simulation_timer == Some(timer.id) => {
                    self.simulation_timer = None;
                    self.finish_simulation()
                }
                TimerKind::Notification if self.notification_timer == Some(timer.id) => {
                    self.expire_notification()
                }
                _ => {
                    log::debug!("timer {} fired after being superseded, ignoring", timer.id);
                    vec![]
                }
            };
            self.record_all(timer.due_at, &fired)?;
            events.extend(fired);
        }
        Ok(events)
    }

    /// Run a scripted command sequence, firing timers between commands.
    pub fn replay(&mut self, commands: &[TimedCommand]) -> MatchResult<Vec<SessionEvent>> {
        let mut events = Vec::new();
        for timed in commands {
            events.extend(self.handle(timed.at, timed.command.clone())?);
        }
        Ok(events)
    }

    /// Share the current result through `target`, posting the outcome as a
    /// notification. Does nothing outside the result phase.
    pub fn share(
        &mut self,
        now: Millis,
        target: &mut dyn ShareTarget,
        base_url: &str,
    ) -> MatchResult<Vec<SessionEvent>> {
        let mut events = self.advance_to(now)?;
        let Some(result) = self.shareable_result() else {
            return Ok(events);
        };
        let text = share::share_result(target, &result, base_url);
        events.extend(self.notify(now, text)?);
        Ok(events)
    }

    /// Copy the share link through `target`, posting the outcome.
    pub fn copy_link(
        &mut self,
        now: Millis,
        target: &mut dyn ShareTarget,
        base_url: &str,
    ) -> MatchResult<Vec<SessionEvent>> {
        let mut events = self.advance_to(now)?;
        let Some(result) = self.shareable_result() else {
            return Ok(events);
        };
        let text = share::copy_link(target, &result, base_url);
        events.extend(self.notify(now, text)?);
        Ok(events)
    }

    // ── Outputs ────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run_seed(&self) -> Seed {
        self.run_seed
    }

    pub fn scores(&self) -> &ScoreVector {
        &self.scores
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn progress_index(&self) -> usize {
        self.index
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Quiz => self.questions.get(self.index),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn commentary(&self) -> Option<&Commentary> {
        self.commentary.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn simulation_pending(&self) -> bool {
        self.simulation_timer.is_some_and(|id| self.timers.is_pending(id))
    }

    pub fn next_timer_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The most recent journal entries, at most `journal_limit` of them.
    /// `seq` keeps counting across dropped entries.
    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// The share link for the current result, if there is one.
    pub fn share_link(&self, base_url: &str) -> Option<String> {
        self.result.as_ref().map(|r| codec::share_link(base_url, r))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let in_quiz = self.phase == Phase::Quiz;
        SessionSnapshot {
            session_id:        self.session_id.clone(),
            phase:             self.phase,
            run_seed:          self.run_seed,
            progress_index:    self.index,
            question_count:    self.config.question_count,
            current_question:  self.current_question().cloned(),
            next_question:     if in_quiz { self.questions.get(self.index + 1).cloned() } else { None },
            scores:            self.scores,
            commentary:        if in_quiz { self.commentary.clone() } else { None },
            notification:      self.notification.clone(),
            result:            self.result.clone(),
            matched_candidate: self
                .result
                .as_ref()
                .and_then(|r| self.catalog.candidate(&r.candidate_id))
                .cloned(),
            next_timer_due:    self.timers.next_due(),
        }
    }

    // ── Transitions ────────────────────────────────────────────

    fn start(&mut self) -> Vec<SessionEvent> {
        if self.phase != Phase::Intro {
            return self.ignored("start");
        }

        self.questions = shuffle::select(&self.catalog.questions, self.run_seed, self.config.question_count);
        self.index = 0;
        self.scores = ScoreVector::zero();
        self.answered.clear();
        self.cooldown_until = 0;
        self.commentary = None;
        self.phase = Phase::Quiz;

        let question_ids: Vec<EntityId> = self.questions.iter().map(|q| q.id.clone()).collect();
        log::info!(
            "session {} started: seed={} questions={:?}",
            self.session_id,
            self.run_seed,
            question_ids
        );
        vec![SessionEvent::SessionStarted { seed: self.run_seed, question_ids }]
    }

    fn answer(
        &mut self,
        now: Millis,
        direction: Direction,
        question_id: Option<EntityId>,
    ) -> Vec<SessionEvent> {
        if let Some(rejection) = self.answer_guard(now, question_id.as_deref()) {
            log::debug!("answer rejected: {rejection:?}");
            return vec![SessionEvent::AnswerRejected { rejection }];
        }

        let Some(question) = self.questions.get(self.index) else {
            // Quiz phase always has a current question; treat a gap as stale.
            log::warn!("quiz phase with no question at index {}", self.index);
            return self.ignored("answer");
        };

        let picked = question.option(direction);
        let question_id = question.id.clone();
        let label = picked.label.clone();
        let text = picked.commentary.clone();
        let next_scores = score::accumulate(&self.scores, &picked.weights);

        self.cooldown_until = now.saturating_add(self.config.answer_cooldown_ms);
        self.scores = next_scores;
        self.answered.push(question_id.clone());
        self.commentary = Some(Commentary {
            question_id: question_id.clone(),
            direction,
            label: label.clone(),
            text: text.clone(),
        });

        let mut events = vec![SessionEvent::AnswerAccepted {
            question_id,
            index: self.index,
            direction,
            label,
            commentary: text,
            scores: next_scores,
        }];

        if self.index + 1 >= self.questions.len() {
            self.phase = Phase::Simulating;
            let due_at = now.saturating_add(self.config.simulation_delay_ms);
            let timer_id = self.timers.schedule(TimerKind::Simulation, due_at);
            self.simulation_timer = Some(timer_id);
            events.push(SessionEvent::SimulationScheduled { timer_id, due_at });
        } else {
            self.index += 1;
        }
        events
    }

    /// Debounce and staleness checks. None means the answer may proceed.
    fn answer_guard(&self, now: Millis, question_id: Option<&str>) -> Option<AnswerRejection> {
        if self.phase != Phase::Quiz {
            return Some(AnswerRejection::WrongPhase { phase: self.phase });
        }
        if now < self.cooldown_until {
            return Some(AnswerRejection::CoolingDown { until: self.cooldown_until });
        }
        if let Some(id) = question_id {
            let current = self.questions.get(self.index).map(|q| q.id.as_str());
            if current != Some(id) {
                return Some(if self.answered.iter().any(|a| a == id) {
                    AnswerRejection::AlreadyAnswered { question_id: id.to_string() }
                } else {
                    AnswerRejection::NotCurrentQuestion { question_id: id.to_string() }
                });
            }
        }
        None
    }

    fn finish_simulation(&mut self) -> Vec<SessionEvent> {
        if self.phase != Phase::Simulating {
            log::debug!("simulation timer fired in {:?}, ignoring", self.phase);
            return vec![];
        }

        let archetype = score::resolve(&self.scores);
        let ratio = compatibility::alignment_ratio(
            &self.scores,
            archetype,
            &self.questions,
            &self.config.compatibility,
        );
        let compatibility = compatibility::compute(
            &self.scores,
            archetype,
            &self.questions,
            &self.config.compatibility,
            self.jitter.as_mut(),
        );

        let picked = candidate::select(
            &self.scores,
            archetype,
            &self.catalog.candidates,
            &self.config.hash_multipliers,
        )
        .map(|c| c.id.clone());
        let Some(candidate_id) = picked else {
            // Catalog validation rules out an empty pool; recover anyway.
            log::error!("candidate pool empty at result time, returning to intro");
            if let Some(timer_id) = self.notification_timer.take() {
                self.timers.cancel(timer_id);
            }
            self.clear_run();
            return vec![];
        };

        let result = SessionResult {
            archetype,
            compatibility,
            candidate_id,
        };
        log::info!(
            "session {} result: {} {}% -> {}",
            self.session_id,
            result.archetype,
            result.compatibility,
            result.candidate_id
        );

        self.result = Some(result.clone());
        self.commentary = None;
        self.phase = Phase::Result;
        vec![SessionEvent::ResultComputed { result, scores: self.scores, ratio }]
    }

    fn reset(&mut self, now: Millis) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if let Some(timer_id) = self.simulation_timer.take() {
            if self.timers.cancel(timer_id) {
                events.push(SessionEvent::SimulationCancelled { timer_id });
            }
        }
        if let Some(timer_id) = self.notification_timer.take() {
            self.timers.cancel(timer_id);
        }

        let from = self.phase;
        let next_seed = self.seeds.next_seed(now);
        self.run_seed = next_seed;
        self.clear_run();

        log::debug!("session {} reset from {from:?}, next seed {next_seed}", self.session_id);
        events.push(SessionEvent::SessionReset { next_seed, from });
        events
    }

    /// Back to a blank intro. Timers are left to the caller.
    fn clear_run(&mut self) {
        self.phase = Phase::Intro;
        self.questions.clear();
        self.index = 0;
        self.scores = ScoreVector::zero();
        self.answered.clear();
        self.cooldown_until = 0;
        self.result = None;
        self.commentary = None;
        self.notification = None;
    }

    fn open_link(&mut self, query: &str) -> Vec<SessionEvent> {
        let decoded = match codec::decode(query, &self.catalog) {
            Ok(result) => result,
            Err(e) => {
                log::debug!("ignoring shared link: {e}");
                return vec![SessionEvent::LinkIgnored { reason: e.to_string() }];
            }
        };

        if !self.phase.accepts_links() {
            log::debug!("ignoring shared link during {:?}", self.phase);
            return vec![SessionEvent::LinkIgnored {
                reason: format!("session is in {:?} phase", self.phase),
            }];
        }

        if self.result.as_ref() == Some(&decoded) {
            return vec![];
        }

        self.result = Some(decoded.clone());
        self.commentary = None;
        self.phase = Phase::Result;
        vec![SessionEvent::LinkApplied { result: decoded }]
    }

    fn notify(&mut self, now: Millis, text: &str) -> MatchResult<Vec<SessionEvent>> {
        if let Some(old) = self.notification_timer.take() {
            self.timers.cancel(old);
        }
        self.notification = Some(Notification { text: text.to_string(), posted_at: now });
        let due_at = now.saturating_add(self.config.notification_ms);
        self.notification_timer = Some(self.timers.schedule(TimerKind::Notification, due_at));

        let posted = vec![SessionEvent::NotificationPosted { text: text.to_string() }];
        self.record_all(now, &posted)?;
        Ok(posted)
    }

    fn expire_notification(&mut self) -> Vec<SessionEvent> {
        if let Some(timer_id) = self.notification_timer.take() {
            self.timers.cancel(timer_id);
        }
        match self.notification.take() {
            Some(_) => vec![SessionEvent::NotificationExpired],
            None => vec![],
        }
    }

    fn shareable_result(&self) -> Option<SessionResult> {
        if self.phase != Phase::Result {
            return None;
        }
        self.result.clone()
    }

    fn ignored(&self, command: &str) -> Vec<SessionEvent> {
        log::debug!("{command} ignored in {:?}", self.phase);
        vec![SessionEvent::CommandIgnored { command: command.to_string(), phase: self.phase }]
    }

    // ── Journal ────────────────────────────────────────────────

    fn record_all(&mut self, at: Millis, events: &[SessionEvent]) -> MatchResult<()> {
        for event in events {
            self.journal_seq += 1;
            let entry = JournalEntry {
                seq:        self.journal_seq,
                at,
                event_type: event.type_name().to_string(),
                payload:    serde_json::to_string(event)?,
            };
            self.journal.push(entry);
        }
        let limit = self.config.journal_limit;
        if self.journal.len() > limit {
            let excess = self.journal.len() - limit;
            self.journal.drain(..excess);
        }
        Ok(())
    }
}
