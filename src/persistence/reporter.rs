//! Persistence boundary
//!
//! `ScoreReporter` is the only caller of a `ScoreStore`. Submissions are
//! retried a bounded number of times and then dropped; queries degrade to
//! empty answers. Errors are logged here and never reach the game engine.

use super::{HistoryPoint, Player, ScoreRecord, ScoreStore};
use crate::highscores::BestScores;
use crate::sim::{Mode, SessionResult};

/// Default extra attempts after a failed submit
const DEFAULT_RETRIES: u32 = 1;

#[derive(Debug)]
pub struct ScoreReporter<S> {
    store: S,
    player: Player,
    retries: u32,
}

impl<S: ScoreStore> ScoreReporter<S> {
    pub fn new(store: S, player: Player) -> Self {
        Self {
            store,
            player,
            retries: DEFAULT_RETRIES,
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Forward a finished session. Returns true if the store accepted it.
    pub fn report(&self, result: &SessionResult) -> bool {
        for attempt in 0..=self.retries {
            match self
                .store
                .submit_score(&self.player, result.score, result.mode)
            {
                Ok(()) => {
                    log::info!(
                        "Submitted score {} ({}) for {}",
                        result.score,
                        result.mode,
                        self.player.display_name
                    );
                    return true;
                }
                Err(e) => log::warn!(
                    "Score submit attempt {}/{} failed: {}",
                    attempt + 1,
                    self.retries + 1,
                    e
                ),
            }
        }
        log::warn!(
            "Dropping score {} ({}) after {} attempts",
            result.score,
            result.mode,
            self.retries + 1
        );
        false
    }

    pub fn best_score(&self, mode: Mode) -> u32 {
        self.store
            .best_score(&self.player.id, mode)
            .unwrap_or_else(|e| {
                log::warn!("Best score query failed for {}: {}", mode, e);
                0
            })
    }

    /// Remote bests for every mode, ready to merge into the local cache
    pub fn best_scores(&self) -> BestScores {
        let mut best = BestScores::new();
        for mode in Mode::ALL {
            best.record(mode, self.best_score(mode));
        }
        best
    }

    pub fn history(&self, mode: Mode) -> Vec<HistoryPoint> {
        self.store
            .history(&self.player.id, mode)
            .unwrap_or_else(|e| {
                log::warn!("History query failed for {}: {}", mode, e);
                Vec::new()
            })
    }

    pub fn leaderboard(&self, mode: Option<Mode>, limit: usize) -> Vec<ScoreRecord> {
        self.store.leaderboard(mode, limit).unwrap_or_else(|e| {
            log::warn!("Leaderboard query failed: {}", e);
            Vec::new()
        })
    }
}
