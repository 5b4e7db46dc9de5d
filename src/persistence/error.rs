//! Errors surfaced by score stores.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),

    #[error("store lock poisoned")]
    Poisoned,
}
