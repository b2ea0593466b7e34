//! Store trait definitions

use crate::{HistoryEvent, StoreResult, StreakRecord};

/// Durable home of the streak record.
///
/// Implementations serialize their own access; callers assume exclusive use
/// of the record between a `load` and the following `save`.
pub trait StreakStore: Send + Sync {
    // Record

    /// Load the persisted record.
    ///
    /// Returns the default record when nothing has been saved yet, and
    /// [`StoreError::Corrupt`](crate::StoreError::Corrupt) when the stored
    /// bytes do not decode.
    fn load(&self) -> StoreResult<StreakRecord>;

    /// Persist the full record, replacing what was stored
    fn save(&self, record: &StreakRecord) -> StoreResult<()>;

    // History

    /// Append a history event
    fn append_history(&self, event: HistoryEvent) -> StoreResult<()>;

    /// Get recent history events, newest first
    fn recent_history(&self, limit: usize) -> StoreResult<Vec<HistoryEvent>>;

    // Health

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
