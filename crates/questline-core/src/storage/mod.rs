//! # Storage Module
//!
//! The persistence adapter: JSON values under string keys on top of a raw
//! byte-oriented backend.
//!
//! Backends:
//! - [`MemoryBackend`]: in-process map, also the basis of snapshot files
//! - [`RedbBackend`]: redb embedded database (ACID, crash-safe)
//!
//! Persistence is best-effort. Read failures degrade to the caller's
//! default, write failures are logged and dropped. Neither ever reaches the
//! lifecycle controller.

mod json;
mod memory;
mod redb_store;

pub use json::JsonStore;
pub use memory::MemoryBackend;
pub use redb_store::RedbBackend;

use crate::formats::FormatError;
use thiserror::Error;

/// Key for the map of quest id -> completion record.
pub const COMPLETIONS_KEY: &str = "completed_quests";

/// Key for the map of quest id -> cooldown expiry.
pub const COOLDOWNS_KEY: &str = "quest_cooldowns";

/// Key for player stats.
pub const STATS_KEY: &str = "player_stats";

/// Errors raised by backends. Never surfaced past [`JsonStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot format error: {0}")]
    Format(#[from] FormatError),
}

/// Raw key-value persistence.
pub trait KeyValueBackend {
    /// Read the bytes stored under `key`, `None` if absent.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}
