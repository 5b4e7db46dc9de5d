//! Local best-score cache
//!
//! One integer per mode, persisted through platform storage (LocalStorage on
//! the web, a JSON file on native).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::platform::storage;
use crate::sim::Mode;

/// Best score per mode
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BestScores {
    pub entries: BTreeMap<Mode, u32>,
}

impl BestScores {
    /// Storage key
    const STORAGE_KEY: &'static str = "speed_math_best_scores";

    /// Create empty cache
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Cached best for `mode` (0 if none)
    pub fn get(&self, mode: Mode) -> u32 {
        self.entries.get(&mode).copied().unwrap_or(0)
    }

    /// Store `score` if it beats the cached value. Returns true when written.
    pub fn record(&mut self, mode: Mode, score: u32) -> bool {
        if score == 0 || score <= self.get(mode) {
            return false;
        }
        self.entries.insert(mode, score);
        true
    }

    /// Fold in a best reported elsewhere (e.g. the remote store)
    pub fn merge(&mut self, other: &BestScores) {
        for (&mode, &score) in &other.entries {
            self.record(mode, score);
        }
    }

    /// Check if nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from platform storage, falling back to empty
    pub fn load() -> Self {
        if let Some(json) = storage::read(Self::STORAGE_KEY) {
            match serde_json::from_str::<BestScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded best scores for {} modes", scores.entries.len());
                    return scores;
                }
                Err(e) => log::warn!("Ignoring unreadable best scores: {}", e),
            }
        }

        log::info!("No best scores found, starting fresh");
        Self::new()
    }

    /// Save to platform storage; failures are logged and dropped
    pub fn save(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode best scores: {}", e);
                return;
            }
        };
        match storage::write(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("Best scores saved ({} modes)", self.entries.len()),
            Err(e) => log::warn!("Could not save best scores: {}", e),
        }
    }
}
