//! Streak tracker

use chrono::{DateTime, Local, NaiveDate};
use kindling_config::{GoalRules, Milestones};
use kindling_store::{
    Goal, HistoryEvent, HistoryEventType, RewardRecord, StoreError, StreakRecord, StreakStore,
};
use kindling_util::{days_between, Clock, GoalId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    display_order, normalize_goal_text, resolve_goal_id, CheckInOutcome, CheckInResult,
    GoalError, GoalProgress, MilestoneReached, Notifier, StreakError, StreakResult, StreakStatus,
};

/// Result of claiming a reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimOutcome {
    Claimed,
    AlreadyClaimed,
}

/// Owns the streak record and applies check-ins, reward claims, and goal
/// edits to it.
pub struct StreakTracker {
    store: Arc<dyn StreakStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    milestones: Milestones,
    goal_rules: GoalRules,
    record: StreakRecord,
}

impl StreakTracker {
    /// Load the record from `store` and build a tracker around it.
    ///
    /// A record that fails to decode is treated as no prior state; the
    /// corrupt bytes stay in the store until the next successful save.
    pub fn open(
        store: Arc<dyn StreakStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        milestones: Milestones,
    ) -> StreakResult<Self> {
        let record = match store.load() {
            Ok(record) => record,
            Err(StoreError::Corrupt(reason)) => {
                warn!(%reason, "Stored streak record is corrupt, starting fresh");
                StreakRecord::default()
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            current = record.current,
            longest = record.longest,
            last_check_in = ?record.last_check_in,
            "Streak tracker initialized"
        );

        Ok(Self {
            store,
            clock,
            notifier,
            milestones,
            goal_rules: GoalRules::default(),
            record,
        })
    }

    pub fn with_goal_rules(mut self, rules: GoalRules) -> Self {
        self.goal_rules = rules;
        self
    }

    /// The committed record
    pub fn record(&self) -> &StreakRecord {
        &self.record
    }

    // Check-ins

    /// Check in for `today` using the injected clock
    pub fn check_in_now(&mut self) -> StreakResult<CheckInResult> {
        let today = self.clock.today();
        self.check_in(today)
    }

    /// Check in for the calendar day `today`.
    ///
    /// Same-day repeats are no-ops. A day earlier than the last check-in is
    /// rejected without touching the record.
    pub fn check_in(&mut self, today: NaiveDate) -> StreakResult<CheckInResult> {
        let now = self.clock.now();
        let (next, outcome, reached) =
            apply_check_in(&self.record, today, &self.milestones, now)?;

        let result = CheckInResult {
            day: today,
            outcome,
            milestones: reached
                .iter()
                .map(|&milestone| MilestoneReached { milestone })
                .collect(),
        };

        if !result.changed() {
            debug!(day = %today, "Already checked in today");
            self.notify_check_in(&result);
            return Ok(result);
        }

        self.commit(next)?;

        info!(
            day = %today,
            outcome = ?outcome,
            current = self.record.current,
            longest = self.record.longest,
            "Check-in recorded"
        );

        if let Some(kind) = outcome.kind() {
            self.append_history(HistoryEventType::CheckedIn {
                day: today,
                kind,
                current: self.record.current,
            });
        }

        for &milestone in &reached {
            info!(milestone, day = %today, "Milestone reached");
            self.append_history(HistoryEventType::MilestoneReached {
                milestone,
                day: today,
            });
            if let Err(e) = self.notifier.on_milestone(milestone) {
                warn!(milestone, error = %e, "Milestone notification failed");
            }
        }

        self.notify_check_in(&result);

        Ok(result)
    }

    /// Snapshot for a status panel, as seen on `today`
    pub fn status(&self, today: NaiveDate) -> StreakStatus {
        StreakStatus::compute(&self.record, &self.milestones, today)
    }

    /// Status as seen on the clock's current day
    pub fn status_now(&self) -> StreakStatus {
        self.status(self.clock.today())
    }

    /// Most recent history entries, newest first
    pub fn history(&self, limit: usize) -> StreakResult<Vec<HistoryEvent>> {
        Ok(self.store.recent_history(limit)?)
    }

    // Rewards

    /// Unlocked rewards in ascending milestone order
    pub fn rewards(&self) -> impl Iterator<Item = (u32, &RewardRecord)> + '_ {
        self.record.rewards.iter().map(|(&m, r)| (m, r))
    }

    pub fn unclaimed_rewards(&self) -> impl Iterator<Item = (u32, &RewardRecord)> + '_ {
        self.rewards().filter(|(_, r)| !r.claimed)
    }

    /// Mark the reward for `milestone` claimed
    pub fn claim_reward(&mut self, milestone: u32) -> StreakResult<ClaimOutcome> {
        let reward = self
            .record
            .rewards
            .get(&milestone)
            .ok_or(StreakError::RewardLocked(milestone))?;

        if reward.claimed {
            debug!(milestone, "Reward already claimed");
            return Ok(ClaimOutcome::AlreadyClaimed);
        }

        let mut next = self.record.clone();
        if let Some(reward) = next.rewards.get_mut(&milestone) {
            reward.claimed = true;
        }
        self.commit(next)?;

        info!(milestone, "Reward claimed");
        self.append_history(HistoryEventType::RewardClaimed { milestone });

        Ok(ClaimOutcome::Claimed)
    }

    // Goals

    /// Goals in display order
    pub fn goals(&self) -> Vec<&Goal> {
        display_order(&self.record.goals)
    }

    pub fn goal_progress(&self) -> GoalProgress {
        GoalProgress::of(&self.record.goals)
    }

    /// Look up a goal id from its full form or a unique prefix
    pub fn resolve_goal(&self, prefix: &str) -> StreakResult<GoalId> {
        Ok(resolve_goal_id(&self.record.goals, prefix)?)
    }

    pub fn add_goal(&mut self, text: &str, important: bool) -> StreakResult<Goal> {
        let text = normalize_goal_text(text, &self.goal_rules)?;
        let goal = Goal {
            id: GoalId::new(),
            text,
            completed: false,
            important,
            created_at: self.clock.now(),
        };

        let mut next = self.record.clone();
        next.goals.push(goal.clone());
        self.commit(next)?;

        info!(goal_id = %goal.id, important, "Goal added");
        Ok(goal)
    }

    pub fn set_goal_completed(&mut self, id: &GoalId, completed: bool) -> StreakResult<Goal> {
        self.update_goal(id, |goal| {
            goal.completed = completed;
            Ok(())
        })
    }

    pub fn toggle_goal_important(&mut self, id: &GoalId) -> StreakResult<Goal> {
        self.update_goal(id, |goal| {
            goal.important = !goal.important;
            Ok(())
        })
    }

    pub fn rename_goal(&mut self, id: &GoalId, text: &str) -> StreakResult<Goal> {
        let text = normalize_goal_text(text, &self.goal_rules)?;
        self.update_goal(id, |goal| {
            goal.text = text;
            Ok(())
        })
    }

    /// Remove a goal, returning it
    pub fn delete_goal(&mut self, id: &GoalId) -> StreakResult<Goal> {
        let index = self
            .record
            .goals
            .iter()
            .position(|g| &g.id == id)
            .ok_or_else(|| GoalError::NotFound(id.to_string()))?;

        let mut next = self.record.clone();
        let removed = next.goals.remove(index);
        self.commit(next)?;

        info!(goal_id = %id, "Goal deleted");
        Ok(removed)
    }

    fn update_goal<F>(&mut self, id: &GoalId, edit: F) -> StreakResult<Goal>
    where
        F: FnOnce(&mut Goal) -> Result<(), GoalError>,
    {
        let mut next = self.record.clone();
        let goal = next
            .goal_mut(id)
            .ok_or_else(|| GoalError::NotFound(id.to_string()))?;
        edit(goal)?;
        let updated = goal.clone();

        if next == self.record {
            return Ok(updated);
        }

        self.commit(next)?;
        debug!(goal_id = %id, "Goal updated");
        Ok(updated)
    }

    // Internals

    /// Persist `next` and make it the committed record. On failure the
    /// committed record is left as it was.
    fn commit(&mut self, next: StreakRecord) -> StreakResult<()> {
        self.store.save(&next)?;
        self.record = next;
        Ok(())
    }

    /// History is best effort once the record itself is committed
    fn append_history(&self, event: HistoryEventType) {
        let event = HistoryEvent::new(self.clock.now(), event);
        if let Err(e) = self.store.append_history(event) {
            warn!(error = %e, "Failed to append history event");
        }
    }

    fn notify_check_in(&self, result: &CheckInResult) {
        if let Err(e) = self.notifier.on_check_in(result) {
            warn!(error = %e, "Check-in notification failed");
        }
    }
}

/// The check-in state machine.
///
/// Returns the next record, the outcome, and the milestones unlocked by this
/// check-in. Pure: `record` is not modified.
pub fn apply_check_in(
    record: &StreakRecord,
    today: NaiveDate,
    milestones: &Milestones,
    now: DateTime<Local>,
) -> StreakResult<(StreakRecord, CheckInOutcome, Vec<u32>)> {
    let mut next = record.clone();

    let Some(last) = record.last_check_in else {
        next.current = 1;
        next.longest = next.longest.max(1);
        next.last_check_in = Some(today);
        next.active_days.insert(today);
        return Ok((next, CheckInOutcome::FirstCheckIn, Vec::new()));
    };

    let diff_days = days_between(last, today);
    let outcome = match diff_days {
        d if d < 0 => return Err(StreakError::DateBeforeLastCheckIn { last, today }),
        0 => return Ok((next, CheckInOutcome::AlreadyCheckedInToday, Vec::new())),
        1 => {
            next.current = next.current.saturating_add(1);
            next.longest = next.longest.max(next.current);
            next.last_check_in = Some(today);
            CheckInOutcome::StreakExtended {
                new_current: next.current,
            }
        }
        _ => {
            next.current = 1;
            // No-op for consistent records; keeps current <= longest for hand-edited ones
            next.longest = next.longest.max(1);
            next.last_check_in = Some(today);
            CheckInOutcome::StreakReset {
                previous_current: record.current,
            }
        }
    };

    next.active_days.insert(today);

    let reached = match outcome {
        CheckInOutcome::StreakExtended { .. } => unlock_milestones(&mut next, milestones, now),
        _ => Vec::new(),
    };

    Ok((next, outcome, reached))
}

/// Unlock every milestone equal to the current streak that has no reward yet
fn unlock_milestones(
    record: &mut StreakRecord,
    milestones: &Milestones,
    now: DateTime<Local>,
) -> Vec<u32> {
    let mut reached = Vec::new();
    for milestone in milestones.iter() {
        if record.current == milestone && !record.rewards.contains_key(&milestone) {
            record.rewards.insert(milestone, RewardRecord::unlocked(now));
            reached.push(milestone);
        }
    }
    reached
}
