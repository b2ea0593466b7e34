//! Check-in results emitted by the tracker

use chrono::NaiveDate;
use kindling_store::CheckInKind;
use serde::Serialize;

/// What a check-in did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckInOutcome {
    /// First check-in ever; the streak starts at 1
    FirstCheckIn,

    /// Already checked in on this day; nothing changed
    AlreadyCheckedInToday,

    /// Checked in the day after the previous check-in
    StreakExtended { new_current: u32 },

    /// At least one day was missed; the streak restarts at 1
    StreakReset { previous_current: u32 },
}

impl CheckInOutcome {
    /// History classification, `None` for the no-op outcome
    pub fn kind(&self) -> Option<CheckInKind> {
        match self {
            CheckInOutcome::FirstCheckIn => Some(CheckInKind::First),
            CheckInOutcome::AlreadyCheckedInToday => None,
            CheckInOutcome::StreakExtended { .. } => Some(CheckInKind::Extended),
            CheckInOutcome::StreakReset { .. } => Some(CheckInKind::Reset),
        }
    }
}

/// A milestone reward unlocked by a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MilestoneReached {
    pub milestone: u32,
}

/// Full result of one check-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInResult {
    pub day: NaiveDate,
    pub outcome: CheckInOutcome,
    pub milestones: Vec<MilestoneReached>,
}

impl CheckInResult {
    /// True when the record was modified
    pub fn changed(&self) -> bool {
        self.outcome != CheckInOutcome::AlreadyCheckedInToday
    }
}
