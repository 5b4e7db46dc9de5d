//! Speed Math - a real-time arithmetic drill game
//!
//! Core modules:
//! - `sim`: Deterministic session engine (question generation, timer, state machine)
//! - `highscores`: Local best-score cache per mode
//! - `persistence`: Score store collaborator and its error boundary
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Preferences and data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::BestScores;
pub use settings::{Settings, Tuning};
pub use sim::{GameEngine, GameEvent, Mode, Question, SessionState};

/// Game configuration constants
pub mod consts {
    /// Fixed timer cadence in seconds (20 Hz)
    pub const TICK_PERIOD: f64 = 0.05;
    /// Maximum ticks processed per frame to prevent spiral of death
    pub const MAX_CATCHUP_TICKS: u32 = 40;

    /// Countdown ceiling, restored on every question transition
    pub const TIME_MAX: f64 = 100.0;
    /// Countdown units removed per tick at difficulty 1.0
    pub const BASE_DECAY_RATE: f64 = 0.8;

    /// Lives at session start
    pub const MAX_LIVES: u8 = 5;

    /// Difficulty gained per correct answer
    pub const DIFFICULTY_STEP: f64 = 0.05;
    /// Difficulty ceiling
    pub const DIFFICULTY_MAX: f64 = 3.0;

    /// Hard cap on random fallback draws when filling distractors
    pub const FALLBACK_ATTEMPTS: u32 = 256;
    /// Number of answer options shown per question
    pub const OPTION_COUNT: usize = 3;
}
