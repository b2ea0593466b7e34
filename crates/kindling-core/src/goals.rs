//! Daily goals checklist rules

use kindling_config::GoalRules;
use kindling_store::Goal;
use kindling_util::GoalId;
use serde::Serialize;
use std::cmp::Ordering;

use crate::GoalError;

/// Completion summary of the checklist
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProgress {
    pub total: usize,
    pub completed: usize,
    /// 0.0 to 100.0; 0.0 for an empty list
    pub percent: f64,
}

impl GoalProgress {
    pub fn of(goals: &[Goal]) -> Self {
        let total = goals.len();
        let completed = goals.iter().filter(|g| g.completed).count();
        let percent = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total,
            completed,
            percent,
        }
    }
}

/// Trim goal text and check it against the configured limits
pub fn normalize_goal_text(text: &str, rules: &GoalRules) -> Result<String, GoalError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GoalError::EmptyText);
    }

    let len = trimmed.chars().count();
    if len > rules.max_text_len {
        return Err(GoalError::TextTooLong {
            len,
            max: rules.max_text_len,
        });
    }

    Ok(trimmed.to_string())
}

/// Display order: incomplete first, important first among incomplete, then
/// newest first.
pub fn display_order(goals: &[Goal]) -> Vec<&Goal> {
    let mut sorted: Vec<&Goal> = goals.iter().collect();
    sorted.sort_by(|a, b| compare_for_display(a, b));
    sorted
}

fn compare_for_display(a: &Goal, b: &Goal) -> Ordering {
    if a.completed != b.completed {
        return a.completed.cmp(&b.completed);
    }

    if !a.completed && a.important != b.important {
        return b.important.cmp(&a.important);
    }

    b.created_at.cmp(&a.created_at)
}

/// Find a goal by its full id or a unique prefix of it
pub fn resolve_goal_id(goals: &[Goal], prefix: &str) -> Result<GoalId, GoalError> {
    let prefix = prefix.trim().to_ascii_lowercase();
    if prefix.is_empty() {
        return Err(GoalError::NotFound(prefix));
    }

    let mut matches = goals
        .iter()
        .filter(|g| g.id.to_string().starts_with(&prefix));

    match (matches.next(), matches.next()) {
        (Some(goal), None) => Ok(goal.id),
        (Some(_), Some(_)) => Err(GoalError::AmbiguousId(prefix)),
        (None, _) => Err(GoalError::NotFound(prefix)),
    }
}
