//! The persisted streak record

use chrono::{DateTime, Local, NaiveDate};
use kindling_util::GoalId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Everything kindling persists: streak counters, unlocked rewards, and the
/// daily goals checklist.
///
/// The default value is the un-initialized state before the first check-in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakRecord {
    /// Length of the active consecutive-day streak
    #[serde(default)]
    pub current: u32,

    /// Historical maximum of `current`
    #[serde(default)]
    pub longest: u32,

    /// Day of the most recent successful check-in
    #[serde(default)]
    pub last_check_in: Option<NaiveDate>,

    /// Every distinct day with a check-in, gaps included
    #[serde(default)]
    pub active_days: BTreeSet<NaiveDate>,

    /// Unlocked rewards keyed by milestone
    #[serde(default)]
    pub rewards: BTreeMap<u32, RewardRecord>,

    /// Daily goals checklist, in insertion order
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl StreakRecord {
    /// True before the first-ever check-in
    pub fn is_fresh(&self) -> bool {
        self.last_check_in.is_none()
    }

    pub fn goal_mut(&mut self, id: &GoalId) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| &g.id == id)
    }
}

/// Marker that a milestone's reward has been unlocked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRecord {
    pub unlocked_at: DateTime<Local>,
    #[serde(default)]
    pub claimed: bool,
}

impl RewardRecord {
    pub fn unlocked(at: DateTime<Local>) -> Self {
        Self {
            unlocked_at: at,
            claimed: false,
        }
    }
}

/// One entry of the daily goals checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub important: bool,
    pub created_at: DateTime<Local>,
}
