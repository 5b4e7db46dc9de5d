//! Score persistence collaborator
//!
//! The session engine never calls a store directly. Finished results are
//! handed to a `ScoreReporter`, which owns a `ScoreStore` and contains every
//! failure at this boundary.
//!
//! Features:
//! - `ScoreStore` contract: submit, best score, history, leaderboard
//! - In-memory store for tests and offline play
//! - Native file store in a versioned JSON envelope (tmp file then rename)

pub mod envelope;
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod memory;
pub mod reporter;
pub mod store;

pub use envelope::{CURRENT_VERSION, Envelope};
pub use error::PersistenceError;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileScoreStore;
pub use memory::InMemoryScoreStore;
pub use reporter::ScoreReporter;
pub use store::{DEFAULT_LEADERBOARD_SIZE, HistoryPoint, Player, ScoreRecord, ScoreStore};
