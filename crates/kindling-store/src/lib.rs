//! Persistence layer for kindling
//!
//! Provides:
//! - The persisted streak record (counters, rewards, goals)
//! - Check-in history (append-only)
//! - SQLite and in-memory store implementations

mod history;
mod memory;
mod record;
mod sqlite;
mod traits;

pub use history::*;
pub use memory::*;
pub use record::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Stored record is corrupt: {0}")]
    Corrupt(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
