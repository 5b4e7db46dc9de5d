//! Score store contract and record shapes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::PersistenceError;
use crate::sim::Mode;

/// Leaderboard length when the caller has no preference
pub const DEFAULT_LEADERBOARD_SIZE: usize = 20;

/// Shown for players without a display name
const ANONYMOUS: &str = "Anonymous";

/// Identity a score is filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub display_name: String,
}

impl Player {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let display_name = if display_name.trim().is_empty() {
            ANONYMOUS.to_string()
        } else {
            display_name.trim().to_string()
        };
        Self {
            id: id.into(),
            display_name,
        }
    }

    pub fn anonymous(id: impl Into<String>) -> Self {
        Self::new(id, ANONYMOUS)
    }
}

/// One submitted score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_id: String,
    #[serde(default = "anonymous_name")]
    pub display_name: String,
    pub score: u32,
    pub mode: Mode,
    /// Unix timestamp (ms) when submitted
    pub timestamp: f64,
}

fn anonymous_name() -> String {
    ANONYMOUS.to_string()
}

impl ScoreRecord {
    pub fn new(player: &Player, score: u32, mode: Mode, timestamp: f64) -> Self {
        Self {
            player_id: player.id.clone(),
            display_name: player.display_name.clone(),
            score,
            mode,
            timestamp,
        }
    }
}

/// A point on a player's progress chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub score: u32,
    pub timestamp: f64,
}

/// Remote or local score persistence.
///
/// Implementors only need `submit_score` and `records`; the queries have
/// default implementations over the full record list.
pub trait ScoreStore {
    /// Append a score for `player` in `mode`
    fn submit_score(
        &self,
        player: &Player,
        score: u32,
        mode: Mode,
    ) -> Result<(), PersistenceError>;

    /// Every stored record, in insertion order
    fn records(&self) -> Result<Vec<ScoreRecord>, PersistenceError>;

    /// Highest score for a player in a mode (0 if none)
    fn best_score(&self, player_id: &str, mode: Mode) -> Result<u32, PersistenceError> {
        Ok(self
            .records()?
            .iter()
            .filter(|r| r.player_id == player_id && r.mode == mode)
            .map(|r| r.score)
            .max()
            .unwrap_or(0))
    }

    /// Chronological scores for a player in a mode
    fn history(&self, player_id: &str, mode: Mode) -> Result<Vec<HistoryPoint>, PersistenceError> {
        let mut points: Vec<HistoryPoint> = self
            .records()?
            .into_iter()
            .filter(|r| r.player_id == player_id && r.mode == mode)
            .map(|r| HistoryPoint {
                score: r.score,
                timestamp: r.timestamp,
            })
            .collect();
        points.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Ok(points)
    }

    /// Each player's best, highest first. `None` ranks across all modes.
    fn leaderboard(
        &self,
        mode: Option<Mode>,
        limit: usize,
    ) -> Result<Vec<ScoreRecord>, PersistenceError> {
        let mut best: HashMap<String, ScoreRecord> = HashMap::new();
        for record in self.records()? {
            if mode.is_some_and(|m| m != record.mode) {
                continue;
            }
            match best.get(&record.player_id) {
                Some(existing) if existing.score >= record.score => {}
                _ => {
                    best.insert(record.player_id.clone(), record);
                }
            }
        }

        let mut entries: Vec<ScoreRecord> = best.into_values().collect();
        // Earlier achievement wins ties
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.timestamp.total_cmp(&b.timestamp))
        });
        entries.truncate(limit);
        Ok(entries)
    }
}
