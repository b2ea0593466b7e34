//! Check-in history event types

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// How a check-in changed the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInKind {
    First,
    Extended,
    Reset,
}

/// Types of history events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEventType {
    /// A check-in that changed the record
    CheckedIn {
        day: NaiveDate,
        kind: CheckInKind,
        current: u32,
    },

    /// A milestone reward was unlocked
    MilestoneReached { milestone: u32, day: NaiveDate },

    /// An unlocked reward was claimed
    RewardClaimed { milestone: u32 },
}

/// Full history event with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// Unique event ID
    pub id: i64,

    /// Event timestamp
    pub timestamp: DateTime<Local>,

    /// Event type and details
    pub event: HistoryEventType,
}

impl HistoryEvent {
    pub fn new(timestamp: DateTime<Local>, event: HistoryEventType) -> Self {
        Self {
            id: 0, // Will be set by store
            timestamp,
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_is_tagged() {
        let event = HistoryEventType::CheckedIn {
            day: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            kind: CheckInKind::Extended,
            current: 2,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "checked_in");
        assert_eq!(json["kind"], "extended");
        assert_eq!(json["day"], "2024-01-02");
    }
}
