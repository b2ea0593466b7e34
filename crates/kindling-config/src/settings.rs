//! Validated settings structures

use crate::schema::RawConfig;
use crate::validation::validate_milestones;
use crate::{ConfigError, ConfigResult};
use std::path::PathBuf;

/// Streak lengths that unlock a reward unless configured otherwise
pub const DEFAULT_MILESTONES: [u32; 9] = [3, 7, 14, 21, 30, 60, 90, 180, 365];

/// Goal text limit unless configured otherwise
pub const DEFAULT_MAX_GOAL_TEXT_LEN: usize = 280;

/// Validated settings ready for use by the tracker
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub service: ServiceConfig,
    pub milestones: Milestones,
    pub goals: GoalRules,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> ConfigResult<Self> {
        let milestones = match raw.streak.milestones {
            Some(values) => Milestones::new(values)?,
            None => Milestones::default(),
        };

        Ok(Self {
            service: ServiceConfig {
                data_dir: raw
                    .service
                    .data_dir
                    .unwrap_or_else(kindling_util::data_dir_without_env),
            },
            milestones,
            goals: GoalRules {
                max_text_len: raw.goals.max_text_len.unwrap_or(DEFAULT_MAX_GOAL_TEXT_LEN),
            },
        })
    }
}

/// Where the store lives
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
}

impl ServiceConfig {
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(kindling_util::DATABASE_FILENAME)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: kindling_util::data_dir_without_env(),
        }
    }
}

/// Limits applied to goal text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalRules {
    pub max_text_len: usize,
}

impl Default for GoalRules {
    fn default() -> Self {
        Self {
            max_text_len: DEFAULT_MAX_GOAL_TEXT_LEN,
        }
    }
}

/// Non-empty, strictly ascending list of milestone thresholds in days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestones(Vec<u32>);

impl Milestones {
    pub fn new(values: Vec<u32>) -> ConfigResult<Self> {
        let errors = validate_milestones(&values);
        if !errors.is_empty() {
            return Err(ConfigError::ValidationFailed { errors });
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// The largest configured milestone
    pub fn largest(&self) -> u32 {
        // Non-empty by construction
        self.0.last().copied().unwrap_or_default()
    }

    /// The first milestone strictly above `current`, or the largest one once
    /// every milestone has been passed.
    pub fn next_after(&self, current: u32) -> u32 {
        self.iter()
            .find(|&m| m > current)
            .unwrap_or_else(|| self.largest())
    }
}

impl Default for Milestones {
    fn default() -> Self {
        Self(DEFAULT_MILESTONES.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_milestones() {
        let milestones = Milestones::default();
        assert_eq!(milestones.as_slice(), &DEFAULT_MILESTONES);
        assert_eq!(milestones.largest(), 365);
    }

    #[test]
    fn next_milestone_after_current() {
        let milestones = Milestones::default();
        assert_eq!(milestones.next_after(0), 3);
        assert_eq!(milestones.next_after(3), 7);
        assert_eq!(milestones.next_after(29), 30);
        assert_eq!(milestones.next_after(365), 365);
        assert_eq!(milestones.next_after(1000), 365);
    }

    #[test]
    fn reject_invalid_milestones() {
        assert!(Milestones::new(vec![]).is_err());
        assert!(Milestones::new(vec![5, 3]).is_err());
        assert!(Milestones::new(vec![0, 3]).is_err());
        assert!(Milestones::new(vec![1, 2]).is_ok());
    }

    #[test]
    fn database_lives_in_data_dir() {
        let service = ServiceConfig {
            data_dir: PathBuf::from("/data/kindling"),
        };
        assert_eq!(
            service.database_path(),
            PathBuf::from("/data/kindling/kindling.db")
        );
    }
}
