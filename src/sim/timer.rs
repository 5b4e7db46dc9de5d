//! Countdown timer and tick sources
//!
//! `Countdown` is the per-question clock. A `TickSource` decides how many
//! fixed-cadence ticks are due; the engine pulls from it only while playing.

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_DECAY_RATE, MAX_CATCHUP_TICKS, TICK_PERIOD, TIME_MAX};

/// Remaining time at or below this counts as expired (absorbs float drift)
const EXPIRY_EPSILON: f64 = 1e-9;

/// Result of advancing the countdown by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    Running,
    /// Countdown hit zero; the consumer must treat this as a miss
    Expired,
}

/// Bounded countdown in [0, max]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f64,
    max: f64,
    base_decay: f64,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(TIME_MAX, BASE_DECAY_RATE)
    }
}

impl Countdown {
    pub fn new(max: f64, base_decay: f64) -> Self {
        Self {
            remaining: max,
            max,
            base_decay,
        }
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn fraction(&self) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.max).clamp(0.0, 1.0)
    }

    /// Units removed per tick at the given difficulty scale
    pub fn decay_per_tick(&self, scale: f64) -> f64 {
        self.base_decay * scale
    }

    /// Refill to the ceiling
    pub fn reset(&mut self) {
        self.remaining = self.max;
    }

    /// Advance one tick; never goes below zero
    pub fn advance(&mut self, scale: f64) -> TimerOutcome {
        let next = self.remaining - self.decay_per_tick(scale);
        if next <= EXPIRY_EPSILON {
            self.remaining = 0.0;
            TimerOutcome::Expired
        } else {
            self.remaining = next;
            TimerOutcome::Running
        }
    }
}

/// Source of fixed-cadence ticks injected into the engine.
pub trait TickSource {
    /// Number of ticks due since the last poll
    fn poll(&mut self) -> u32;

    /// Drop anything accumulated while the timer is stopped
    fn reset(&mut self);
}

/// Wall-clock driven source using a fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    period: f64,
    accumulator: f64,
    max_catchup: u32,
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl FixedStepClock {
    pub fn new(period: f64) -> Self {
        Self {
            period: if period > 0.0 { period } else { TICK_PERIOD },
            accumulator: 0.0,
            max_catchup: MAX_CATCHUP_TICKS,
        }
    }

    /// Override the per-poll tick cap
    pub fn with_max_catchup(mut self, max_catchup: u32) -> Self {
        self.max_catchup = max_catchup.max(1);
        self
    }

    /// Feed elapsed wall time in seconds
    pub fn advance(&mut self, elapsed_secs: f64) {
        if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
            self.accumulator += elapsed_secs;
        }
    }
}

impl TickSource for FixedStepClock {
    fn poll(&mut self) -> u32 {
        let mut due = 0;
        while self.accumulator >= self.period && due < self.max_catchup {
            self.accumulator -= self.period;
            due += 1;
        }
        // Past the cap the backlog is dropped rather than replayed later
        if due == self.max_catchup {
            self.accumulator = self.accumulator.min(self.period);
        }
        due
    }

    fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Deterministic fake clock: ticks are queued by hand
#[derive(Debug, Clone, Default)]
pub struct ManualTicks {
    pending: u32,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ticks: u32) {
        self.pending = self.pending.saturating_add(ticks);
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }
}

impl TickSource for ManualTicks {
    fn poll(&mut self) -> u32 {
        std::mem::take(&mut self.pending)
    }

    fn reset(&mut self) {
        self.pending = 0;
    }
}
