//! Difficulty controller
//!
//! A single speed multiplier that only ever grows within a session. It feeds
//! the countdown decay and nothing else.

use serde::{Deserialize, Serialize};

use crate::consts::{DIFFICULTY_MAX, DIFFICULTY_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    scale: f64,
    step: f64,
    max: f64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new(DIFFICULTY_STEP, DIFFICULTY_MAX)
    }
}

impl Difficulty {
    /// Start at 1.0, growing by `step` up to `max`
    pub fn new(step: f64, max: f64) -> Self {
        Self {
            scale: 1.0,
            step: step.max(0.0),
            max: max.max(1.0),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Speed up after a correct answer
    pub fn on_correct(&mut self) {
        self.scale = (self.scale + self.step).min(self.max);
    }
}
