//! SQLite-based store implementation

use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{HistoryEvent, HistoryEventType, StoreError, StoreResult, StreakRecord, StreakStore};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("store lock poisoned".into()))
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Streak record (single row)
            CREATE TABLE IF NOT EXISTS record (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                record_json TEXT NOT NULL
            );

            -- Check-in history (append-only)
            CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                event_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_history_timestamp ON history(timestamp);
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }

    /// Overwrite the stored record JSON verbatim (for testing recovery paths)
    #[doc(hidden)]
    pub fn write_raw_record(&self, json: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO record (id, record_json)
            VALUES (1, ?)
            ON CONFLICT(id)
            DO UPDATE SET record_json = excluded.record_json
            "#,
            [json],
        )?;
        Ok(())
    }
}

impl StreakStore for SqliteStore {
    fn load(&self) -> StoreResult<StreakRecord> {
        let conn = self.conn()?;

        let json: Option<String> = conn
            .query_row("SELECT record_json FROM record WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match json {
            Some(s) => serde_json::from_str(&s).map_err(|e| StoreError::Corrupt(e.to_string())),
            None => Ok(StreakRecord::default()),
        }
    }

    fn save(&self, record: &StreakRecord) -> StoreResult<()> {
        let json = serde_json::to_string(record)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO record (id, record_json)
            VALUES (1, ?)
            ON CONFLICT(id)
            DO UPDATE SET record_json = excluded.record_json
            "#,
            [json],
        )?;

        debug!(
            current = record.current,
            longest = record.longest,
            goals = record.goals.len(),
            "Record saved"
        );
        Ok(())
    }

    fn append_history(&self, event: HistoryEvent) -> StoreResult<()> {
        let event_json = serde_json::to_string(&event.event)?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO history (timestamp, event_json) VALUES (?, ?)",
            params![event.timestamp.to_rfc3339(), event_json],
        )?;

        debug!(event_id = conn.last_insert_rowid(), "History event appended");

        Ok(())
    }

    fn recent_history(&self, limit: usize) -> StoreResult<Vec<HistoryEvent>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, timestamp, event_json FROM history ORDER BY id DESC LIMIT ?",
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let id: i64 = row.get(0)?;
            let timestamp_str: String = row.get(1)?;
            let event_json: String = row.get(2)?;
            Ok((id, timestamp_str, event_json))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (id, timestamp_str, event_json) = row?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
                .map(|dt| dt.with_timezone(&Local))
                .map_err(|e| StoreError::Corrupt(e.to_string()))?;
            let event: HistoryEventType = serde_json::from_str(&event_json)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?;

            events.push(HistoryEvent {
                id,
                timestamp,
                event,
            });
        }

        Ok(events)
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CheckInKind, RewardRecord};
    use chrono::{NaiveDate, TimeZone};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_in_memory_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.is_healthy());
    }

    #[test]
    fn test_load_without_record_is_default() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.load().unwrap(), StreakRecord::default());
    }

    #[test]
    fn test_save_and_load_record() {
        let store = SqliteStore::in_memory().unwrap();
        let at = Local.with_ymd_and_hms(2024, 1, 3, 8, 0, 0).unwrap();

        let mut record = StreakRecord {
            current: 3,
            longest: 3,
            last_check_in: Some(day(2024, 1, 3)),
            ..Default::default()
        };
        record.rewards.insert(3, RewardRecord::unlocked(at));
        store.save(&record).unwrap();

        assert_eq!(store.load().unwrap(), record);

        // Saving again replaces the single row
        record.current = 4;
        store.save(&record).unwrap();
        assert_eq!(store.load().unwrap().current, 4);
    }

    #[test]
    fn test_corrupt_record_is_reported() {
        let store = SqliteStore::in_memory().unwrap();
        store.write_raw_record("{not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_history_newest_first() {
        let store = SqliteStore::in_memory().unwrap();
        let at = Local.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();

        for (i, kind) in [CheckInKind::First, CheckInKind::Extended, CheckInKind::Extended]
            .into_iter()
            .enumerate()
        {
            let event = HistoryEvent::new(
                at + chrono::Duration::days(i as i64),
                HistoryEventType::CheckedIn {
                    day: day(2024, 1, 1 + i as u32),
                    kind,
                    current: i as u32 + 1,
                },
            );
            store.append_history(event).unwrap();
        }

        let events = store.recent_history(2).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].id > events[1].id);
        assert!(matches!(
            events[0].event,
            HistoryEventType::CheckedIn { current: 3, .. }
        ));
        assert_eq!(events[0].timestamp, at + chrono::Duration::days(2));
    }

    #[test]
    fn test_undecodable_history_row_is_corrupt() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO history (timestamp, event_json) VALUES (?, ?)",
                params!["2024-01-01T08:00:00+00:00", "{\"type\": \"exploded\"}"],
            )
            .unwrap();

        assert!(matches!(
            store.recent_history(10),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn test_bad_history_timestamp_is_corrupt() {
        let store = SqliteStore::in_memory().unwrap();
        let event_json = serde_json::to_string(&HistoryEventType::RewardClaimed { milestone: 3 })
            .unwrap();
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO history (timestamp, event_json) VALUES (?, ?)",
                params!["yesterday", event_json],
            )
            .unwrap();

        assert!(matches!(
            store.recent_history(10),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn test_record_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kindling.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            let record = StreakRecord {
                current: 1,
                longest: 7,
                last_check_in: Some(day(2024, 5, 1)),
                ..Default::default()
            };
            store.save(&record).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let record = store.load().unwrap();
        assert_eq!(record.longest, 7);
        assert_eq!(record.last_check_in, Some(day(2024, 5, 1)));
    }
}
