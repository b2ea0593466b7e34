//! Streak status snapshot for front ends

use chrono::NaiveDate;
use kindling_config::Milestones;
use kindling_store::StreakRecord;
use serde::Serialize;

/// Position of one milestone on the streak progress bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MilestoneMarker {
    pub milestone: u32,
    pub reached: bool,
    /// Where the marker sits, as a percentage of the largest milestone
    pub position_percent: f64,
}

/// Everything a status panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakStatus {
    pub current: u32,
    pub longest: u32,
    pub last_check_in: Option<NaiveDate>,
    pub checked_in_today: bool,
    /// Distinct days with a check-in
    pub active_days: usize,
    pub next_milestone: u32,
    pub markers: Vec<MilestoneMarker>,
    pub unclaimed_rewards: Vec<u32>,
}

impl StreakStatus {
    pub fn compute(record: &StreakRecord, milestones: &Milestones, today: NaiveDate) -> Self {
        let largest = milestones.largest().max(1) as f64;
        let markers = milestones
            .iter()
            .map(|m| MilestoneMarker {
                milestone: m,
                reached: record.current >= m,
                position_percent: m as f64 / largest * 100.0,
            })
            .collect();

        let unclaimed_rewards = record
            .rewards
            .iter()
            .filter(|(_, r)| !r.claimed)
            .map(|(&m, _)| m)
            .collect();

        Self {
            current: record.current,
            longest: record.longest,
            last_check_in: record.last_check_in,
            checked_in_today: record.last_check_in == Some(today),
            active_days: record.active_days.len(),
            next_milestone: milestones.next_after(record.current),
            markers,
            unclaimed_rewards,
        }
    }

    /// Days left until the next milestone, zero once every milestone is passed
    pub fn days_to_next_milestone(&self) -> u32 {
        self.next_milestone.saturating_sub(self.current)
    }
}
