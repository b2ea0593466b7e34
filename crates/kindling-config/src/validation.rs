//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Milestone list is empty")]
    EmptyMilestones,

    #[error("Milestone must be at least 1 day, got {0}")]
    ZeroMilestone(u32),

    #[error("Milestones must be strictly ascending: {previous} is followed by {next}")]
    MilestonesNotAscending { previous: u32, next: u32 },

    #[error("goals.max_text_len must be at least 1")]
    ZeroGoalTextLen,
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(milestones) = &config.streak.milestones {
        errors.extend(validate_milestones(milestones));
    }

    if config.goals.max_text_len == Some(0) {
        errors.push(ValidationError::ZeroGoalTextLen);
    }

    errors
}

/// Validate a list of milestone thresholds
pub fn validate_milestones(milestones: &[u32]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if milestones.is_empty() {
        errors.push(ValidationError::EmptyMilestones);
        return errors;
    }

    for &m in milestones {
        if m == 0 {
            errors.push(ValidationError::ZeroMilestone(m));
        }
    }

    for pair in milestones.windows(2) {
        if pair[1] <= pair[0] {
            errors.push(ValidationError::MilestonesNotAscending {
                previous: pair[0],
                next: pair[1],
            });
        }
    }

    errors
}
