//! Core streak engine for kindling
//!
//! This crate is the heart of kindling, containing:
//! - The check-in state machine (first / same day / extended / reset)
//! - Milestone detection with at-most-once reward unlocking
//! - Reward claiming and streak status reporting
//! - The daily goals checklist
//!
//! Every mutation is computed on a copy of the record and swapped in only
//! after the store accepted it.

mod events;
mod goals;
mod notifier;
mod status;
mod tracker;

pub use events::*;
pub use goals::*;
pub use notifier::*;
pub use status::*;
pub use tracker::*;

use chrono::NaiveDate;
use kindling_store::StoreError;
use thiserror::Error;

/// Errors from tracker operations
#[derive(Debug, Error)]
pub enum StreakError {
    #[error("Check-in for {today} is earlier than the last check-in on {last}")]
    DateBeforeLastCheckIn { last: NaiveDate, today: NaiveDate },

    #[error("Reward for the {0}-day milestone has not been unlocked")]
    RewardLocked(u32),

    #[error(transparent)]
    Goal(#[from] GoalError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type StreakResult<T> = Result<T, StreakError>;

/// Errors from goal checklist operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    #[error("Goal text cannot be empty")]
    EmptyText,

    #[error("Goal text is {len} characters, the limit is {max}")]
    TextTooLong { len: usize, max: usize },

    #[error("Goal not found: {0}")]
    NotFound(String),

    #[error("Goal id prefix '{0}' matches more than one goal")]
    AmbiguousId(String),
}
