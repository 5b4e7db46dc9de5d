//! Session state machine
//!
//! `GameEngine` owns the one live `GameSession` and is the only thing that
//! mutates it. Every operation runs to completion before the next, so a tick
//! can never interleave with an answer. Input that does not fit the current
//! state is ignored and returns `None`.

use rand::Rng;
use rand_pcg::Pcg32;

use super::difficulty::Difficulty;
use super::question::{Question, generate_question_with_cap};
use super::state::{GameSession, Mode, RngState, SessionId, SessionResult, SessionState};
use super::timer::{Countdown, TickSource, TimerOutcome};
use crate::highscores::BestScores;
use crate::settings::Tuning;

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissCause {
    WrongAnswer,
    Timeout,
}

/// Observable result of an engine operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started { session: SessionId, mode: Mode },
    Correct { score: u32 },
    Missed { cause: MissCause, lives: u8 },
    GameOver(SessionResult),
    Paused,
    Resumed,
    Abandoned,
}

/// Drill game engine, generic over the injected random source
#[derive(Debug)]
pub struct GameEngine<R = Pcg32> {
    rng: R,
    tuning: Tuning,
    selected_mode: Mode,
    best: BestScores,
    session: Option<GameSession>,
    next_session_id: u64,
}

impl GameEngine<Pcg32> {
    /// Engine with a seeded PCG source
    pub fn new(seed: u64) -> Self {
        Self::with_rng(RngState::new(seed).to_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            tuning: Tuning::default(),
            selected_mode: Mode::default(),
            best: BestScores::new(),
            session: None,
            next_session_id: 1,
        }
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning.sanitized();
        self
    }

    /// Seed the local best-score cache
    pub fn with_best_scores(mut self, best: BestScores) -> Self {
        self.best = best;
        self
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or(SessionState::Menu)
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref().map(|s| &s.question)
    }

    /// Sequence number of the current question within its session
    pub fn question_seq(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.question_seq)
    }

    pub fn selected_mode(&self) -> Mode {
        self.selected_mode
    }

    pub fn best_scores(&self) -> &BestScores {
        &self.best
    }

    pub fn best_scores_mut(&mut self) -> &mut BestScores {
        &mut self.best
    }

    fn is_active(&self) -> bool {
        matches!(self.state(), SessionState::Playing | SessionState::Paused)
    }

    /// Choose the mode for the next session. Returns the cached best for it,
    /// or `None` while a session is in progress.
    pub fn select_mode(&mut self, mode: Mode) -> Option<u32> {
        if self.is_active() {
            return None;
        }
        self.selected_mode = mode;
        Some(self.best.get(mode))
    }

    /// Start a fresh session from Menu or GameOver
    pub fn start(&mut self, mode: Mode) -> Option<GameEvent> {
        self.select_mode(mode)?;

        let id = SessionId(self.next_session_id);
        self.next_session_id += 1;

        let t = &self.tuning;
        let question = generate_question_with_cap(mode, &mut self.rng, t.fallback_attempts);
        let session = GameSession {
            id,
            phase: SessionState::Playing,
            mode,
            score: 0,
            lives: t.max_lives,
            difficulty: Difficulty::new(t.difficulty_step, t.difficulty_max),
            timer: Countdown::new(t.time_max, t.base_decay_rate),
            question,
            question_seq: 0,
            best_at_start: self.best.get(mode),
            last_forwarded: None,
        };
        log::info!(
            "Session {} started: mode={}, best={}",
            id.0,
            mode,
            session.best_at_start
        );
        self.session = Some(session);

        Some(GameEvent::Started { session: id, mode })
    }

    /// Restart with the currently selected mode
    pub fn restart(&mut self) -> Option<GameEvent> {
        self.start(self.selected_mode)
    }

    /// Submit an answer value
    pub fn answer(&mut self, choice: i32) -> Option<GameEvent> {
        let session = self.session.as_mut()?;
        if session.phase != SessionState::Playing {
            return None;
        }

        if session.question.is_correct(choice) {
            session.score += 1;
            session.difficulty.on_correct();
            session.timer.reset();
            session.replace_question(generate_question_with_cap(
                session.mode,
                &mut self.rng,
                self.tuning.fallback_attempts,
            ));
            self.best.record(session.mode, session.score);
            log::debug!(
                "Correct: score={}, scale={:.2}",
                session.score,
                session.difficulty.scale()
            );
            Some(GameEvent::Correct {
                score: session.score,
            })
        } else {
            Some(apply_miss(
                session,
                &mut self.rng,
                &self.tuning,
                MissCause::WrongAnswer,
            ))
        }
    }

    /// Answer by display slot (0, 1 or 2)
    pub fn select(&mut self, index: usize) -> Option<GameEvent> {
        if self.state() != SessionState::Playing {
            return None;
        }
        let choice = self.current_question()?.option(index)?;
        self.answer(choice)
    }

    /// Answer by slot for the question the player was shown. Dropped when
    /// that question has since been replaced (e.g. by a timeout).
    pub fn select_for(&mut self, shown_seq: u64, index: usize) -> Option<GameEvent> {
        if self.question_seq() != Some(shown_seq) {
            log::debug!("Dropping answer for replaced question {}", shown_seq);
            return None;
        }
        self.select(index)
    }

    /// Advance the countdown by one fixed tick
    pub fn tick(&mut self) -> Option<GameEvent> {
        let session = self.session.as_mut()?;
        if session.phase != SessionState::Playing {
            return None;
        }

        match session.timer.advance(session.difficulty.scale()) {
            TimerOutcome::Running => None,
            TimerOutcome::Expired => Some(apply_miss(
                session,
                &mut self.rng,
                &self.tuning,
                MissCause::Timeout,
            )),
        }
    }

    /// Tick tagged with the session it was scheduled for; stale ticks are dropped
    pub fn tick_for(&mut self, session: SessionId) -> Option<GameEvent> {
        if self.session_id() != Some(session) {
            log::trace!("Dropping stale tick for session {}", session.0);
            return None;
        }
        self.tick()
    }

    /// Run every tick the source has due. Outside Playing the source is reset
    /// so suspended time is never replayed.
    pub fn pump<S: TickSource + ?Sized>(&mut self, source: &mut S) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state() != SessionState::Playing {
            source.reset();
            return events;
        }

        let due = source.poll();
        for _ in 0..due {
            if let Some(event) = self.tick() {
                events.push(event);
            }
            if self.state() != SessionState::Playing {
                source.reset();
                break;
            }
        }
        events
    }

    pub fn pause(&mut self) -> Option<GameEvent> {
        let session = self.session.as_mut()?;
        if session.phase != SessionState::Playing {
            return None;
        }
        session.phase = SessionState::Paused;
        Some(GameEvent::Paused)
    }

    pub fn resume(&mut self) -> Option<GameEvent> {
        let session = self.session.as_mut()?;
        if session.phase != SessionState::Paused {
            return None;
        }
        session.phase = SessionState::Playing;
        Some(GameEvent::Resumed)
    }

    pub fn toggle_pause(&mut self) -> Option<GameEvent> {
        match self.state() {
            SessionState::Playing => self.pause(),
            SessionState::Paused => self.resume(),
            _ => None,
        }
    }

    /// Discard the session and return to the menu
    pub fn abandon(&mut self) -> Option<GameEvent> {
        let session = self.session.take()?;
        log::info!(
            "Session {} abandoned at score {}",
            session.id.0,
            session.score
        );
        Some(GameEvent::Abandoned)
    }

    /// Hand out the finished session's result for remote submission.
    ///
    /// Yields at most once per GameOver, and only for a new personal best.
    pub fn take_submission(&mut self) -> Option<SessionResult> {
        let session = self.session.as_mut()?;
        if session.phase != SessionState::GameOver {
            return None;
        }
        let result = session.result();
        if !result.new_best || session.last_forwarded == Some(result) {
            return None;
        }
        session.last_forwarded = Some(result);
        Some(result)
    }
}

/// Lose a life; either move on to a new question or end the session
fn apply_miss<R: Rng>(
    session: &mut GameSession,
    rng: &mut R,
    tuning: &Tuning,
    cause: MissCause,
) -> GameEvent {
    session.lives = session.lives.saturating_sub(1);

    if session.lives == 0 {
        session.phase = SessionState::GameOver;
        let result = session.result();
        log::info!(
            "Session {} over: mode={}, score={}, new_best={}",
            session.id.0,
            result.mode,
            result.score,
            result.new_best
        );
        return GameEvent::GameOver(result);
    }

    session.timer.reset();
    session.replace_question(generate_question_with_cap(
        session.mode,
        rng,
        tuning.fallback_attempts,
    ));
    log::debug!("Missed ({:?}): lives={}", cause, session.lives);
    GameEvent::Missed {
        cause,
        lives: session.lives,
    }
}
