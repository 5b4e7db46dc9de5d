//! In-memory score store

use std::sync::{Arc, Mutex};

use super::{PersistenceError, Player, ScoreRecord, ScoreStore};
use crate::platform;
use crate::sim::Mode;

/// Shared, clonable store backed by a vector
#[derive(Debug, Clone, Default)]
pub struct InMemoryScoreStore {
    records: Arc<Mutex<Vec<ScoreRecord>>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit with an explicit timestamp
    pub fn submit_at(
        &self,
        player: &Player,
        score: u32,
        mode: Mode,
        timestamp: f64,
    ) -> Result<(), PersistenceError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| PersistenceError::Poisoned)?;
        guard.push(ScoreRecord::new(player, score, mode, timestamp));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoreStore for InMemoryScoreStore {
    fn submit_score(
        &self,
        player: &Player,
        score: u32,
        mode: Mode,
    ) -> Result<(), PersistenceError> {
        self.submit_at(player, score, mode, platform::now_ms())
    }

    fn records(&self) -> Result<Vec<ScoreRecord>, PersistenceError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| PersistenceError::Poisoned)?;
        Ok(guard.clone())
    }
}
