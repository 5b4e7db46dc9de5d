//! Session state and core types
//!
//! All state owned by a single play-through lives in `GameSession`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::question::Question;
use super::timer::Countdown;

/// Arithmetic operation family used to generate problems
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Mode {
    /// Every mode, in menu order
    pub const ALL: [Mode; 4] = [
        Mode::Addition,
        Mode::Subtraction,
        Mode::Multiplication,
        Mode::Division,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Addition => "addition",
            Mode::Subtraction => "subtraction",
            Mode::Multiplication => "multiplication",
            Mode::Division => "division",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "addition" | "add" | "+" => Some(Mode::Addition),
            "subtraction" | "sub" | "-" => Some(Mode::Subtraction),
            "multiplication" | "mul" | "x" | "×" => Some(Mode::Multiplication),
            "division" | "div" | "/" | "÷" => Some(Mode::Division),
            _ => None,
        }
    }

    /// Operator glyph used in problem text
    pub fn symbol(&self) -> &'static str {
        match self {
            Mode::Addition => "+",
            Mode::Subtraction => "-",
            Mode::Multiplication => "×",
            Mode::Division => "÷",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current phase of the session engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No live session, mode selection allowed
    Menu,
    /// Active gameplay, timer running
    Playing,
    /// Timer suspended, question retained
    Paused,
    /// Lives exhausted, waiting for start or abandon
    GameOver,
}

/// Identity of one session, unique per engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

/// Final outcome emitted at the GameOver transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session: SessionId,
    pub mode: Mode,
    pub score: u32,
    /// Score beats the best known when the session started
    pub new_best: bool,
}

/// RNG seed wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// One live play-through.
///
/// Only reachable through `GameEngine`, which is the single writer. A session
/// exists exactly while the engine is outside `SessionState::Menu`, so the
/// current question is never absent here.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub id: SessionId,
    /// Playing, Paused or GameOver
    pub phase: SessionState,
    pub mode: Mode,
    pub score: u32,
    pub lives: u8,
    pub difficulty: Difficulty,
    pub timer: Countdown,
    pub question: Question,
    /// Bumped every time `question` is replaced
    pub question_seq: u64,
    /// Local best for `mode` when the session started
    pub best_at_start: u32,
    /// Result already handed out for submission (duplicate guard)
    pub last_forwarded: Option<SessionResult>,
}

impl GameSession {
    pub fn difficulty_scale(&self) -> f64 {
        self.difficulty.scale()
    }

    pub fn time_remaining(&self) -> f64 {
        self.timer.remaining()
    }

    /// Countdown progress in [0, 1] for display
    pub fn time_fraction(&self) -> f64 {
        self.timer.fraction()
    }

    /// Swap in the next question
    pub fn replace_question(&mut self, question: Question) {
        self.question = question;
        self.question_seq += 1;
    }

    /// Result as it stands now
    pub fn result(&self) -> SessionResult {
        SessionResult {
            session: self.id,
            mode: self.mode,
            score: self.score,
            new_best: self.score > 0 && self.score > self.best_at_start,
        }
    }
}
