//! Native file-backed score store
//!
//! All records live in one versioned JSON envelope. Every submit rewrites the
//! file through a temp file so a crash never leaves a half-written save.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{Envelope, PersistenceError, Player, ScoreRecord, ScoreStore};
use crate::platform::{self, storage};
use crate::sim::Mode;

#[derive(Debug)]
pub struct FileScoreStore {
    path: PathBuf,
    records: Mutex<Vec<ScoreRecord>>,
}

impl FileScoreStore {
    /// Open `path`, starting empty if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(json) => Envelope::<Vec<ScoreRecord>>::decode(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!(
            "Opened score store {} ({} records)",
            path.display(),
            records.len()
        );
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn submit_score(
        &self,
        player: &Player,
        score: u32,
        mode: Mode,
    ) -> Result<(), PersistenceError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| PersistenceError::Poisoned)?;
        guard.push(ScoreRecord::new(player, score, mode, platform::now_ms()));

        let written = Envelope::new(&*guard)
            .encode()
            .and_then(|json| storage::write_atomic(&self.path, &json));
        if written.is_err() {
            // Keep memory in step with disk
            guard.pop();
        }
        written
    }

    fn records(&self) -> Result<Vec<ScoreRecord>, PersistenceError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| PersistenceError::Poisoned)?;
        Ok(guard.clone())
    }
}
