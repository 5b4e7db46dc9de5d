//! Deterministic session simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick cadence only, supplied by an injected `TickSource`
//! - Injected RNG only (seeded `Pcg32` by default)
//! - No rendering, storage or platform dependencies

pub mod difficulty;
pub mod engine;
pub mod question;
pub mod state;
pub mod timer;

pub use difficulty::Difficulty;
pub use engine::{GameEngine, GameEvent, MissCause};
pub use question::{Problem, Question, generate_question, generate_question_with_cap};
pub use state::{GameSession, Mode, RngState, SessionId, SessionResult, SessionState};
pub use timer::{Countdown, FixedStepClock, ManualTicks, TickSource, TimerOutcome};
