//! Game settings and preferences
//!
//! Persisted separately from scores through platform storage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::storage;
use crate::sim::Mode;

/// Data-driven game balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seconds between timer ticks
    pub tick_period: f64,
    /// Countdown units removed per tick at difficulty 1.0
    pub base_decay_rate: f64,
    /// Countdown ceiling
    pub time_max: f64,
    /// Lives at session start
    pub max_lives: u8,
    /// Difficulty gained per correct answer
    pub difficulty_step: f64,
    /// Difficulty ceiling
    pub difficulty_max: f64,
    /// Random fallback draws before distractors are filled sequentially
    pub fallback_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_period: TICK_PERIOD,
            base_decay_rate: BASE_DECAY_RATE,
            time_max: TIME_MAX,
            max_lives: MAX_LIVES,
            difficulty_step: DIFFICULTY_STEP,
            difficulty_max: DIFFICULTY_MAX,
            fallback_attempts: FALLBACK_ATTEMPTS,
        }
    }
}

impl Tuning {
    /// Replace out-of-range values with defaults
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let positive = |v: f64, fallback: f64| {
            if v.is_finite() && v > 0.0 { v } else { fallback }
        };
        Self {
            tick_period: positive(self.tick_period, d.tick_period),
            base_decay_rate: positive(self.base_decay_rate, d.base_decay_rate),
            time_max: positive(self.time_max, d.time_max),
            max_lives: if self.max_lives == 0 {
                d.max_lives
            } else {
                self.max_lives.min(MAX_LIVES)
            },
            difficulty_step: if self.difficulty_step.is_finite() && self.difficulty_step >= 0.0 {
                self.difficulty_step
            } else {
                d.difficulty_step
            },
            difficulty_max: if self.difficulty_max.is_finite() && self.difficulty_max >= 1.0 {
                self.difficulty_max
            } else {
                d.difficulty_max
            },
            fallback_attempts: self.fallback_attempts,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mode preselected in the menu
    pub last_mode: Mode,
    /// Player id used for score submission
    pub player_id: String,
    /// Name shown on leaderboards
    pub player_name: String,
    /// Game balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_mode: Mode::Addition,
            player_id: "local".to_string(),
            player_name: String::new(),
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "speed_math_settings";

    /// Parse settings JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.tuning = settings.tuning.sanitized();
        Ok(settings)
    }

    /// Load settings from platform storage
    pub fn load() -> Self {
        if let Some(json) = storage::read(Self::STORAGE_KEY) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to platform storage
    pub fn save(&self) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode settings: {}", e);
                return;
            }
        };
        match storage::write(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}
