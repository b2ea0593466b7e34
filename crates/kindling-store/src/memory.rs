//! In-process store

use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::{HistoryEvent, StoreError, StoreResult, StreakRecord, StreakStore};

/// Store that keeps the record in memory, JSON-encoded like the durable
/// stores so decoding behaves the same.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record_json: Mutex<Option<String>>,
    history: Mutex<Vec<HistoryEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from already-encoded record JSON, valid or not
    pub fn with_raw_record(json: impl Into<String>) -> Self {
        Self {
            record_json: Mutex::new(Some(json.into())),
            history: Mutex::new(Vec::new()),
        }
    }

    fn lock<T>(mutex: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
        mutex
            .lock()
            .map_err(|_| StoreError::Database("store lock poisoned".into()))
    }
}

impl StreakStore for MemoryStore {
    fn load(&self) -> StoreResult<StreakRecord> {
        match Self::lock(&self.record_json)?.as_deref() {
            Some(json) => {
                serde_json::from_str(json).map_err(|e| StoreError::Corrupt(e.to_string()))
            }
            None => Ok(StreakRecord::default()),
        }
    }

    fn save(&self, record: &StreakRecord) -> StoreResult<()> {
        let json = serde_json::to_string(record)?;
        *Self::lock(&self.record_json)? = Some(json);
        debug!(current = record.current, "Record saved in memory");
        Ok(())
    }

    fn append_history(&self, mut event: HistoryEvent) -> StoreResult<()> {
        let mut history = Self::lock(&self.history)?;
        event.id = history.len() as i64 + 1;
        history.push(event);
        Ok(())
    }

    fn recent_history(&self, limit: usize) -> StoreResult<Vec<HistoryEvent>> {
        let history = Self::lock(&self.history)?;
        Ok(history.iter().rev().take(limit).cloned().collect())
    }

    fn is_healthy(&self) -> bool {
        self.record_json.lock().is_ok() && self.history.lock().is_ok()
    }
}
