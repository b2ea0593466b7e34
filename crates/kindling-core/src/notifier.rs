//! Notification sink for streak events

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use thiserror::Error;

use crate::{CheckInOutcome, CheckInResult};

/// Notifier errors. The tracker logs these and carries on.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notifier unavailable: {0}")]
    Unavailable(String),

    #[error("Notification failed: {0}")]
    Failed(String),
}

pub type NotifyResult = Result<(), NotifyError>;

/// Receives streak events after they have been committed.
pub trait Notifier: Send + Sync {
    /// A milestone reward was unlocked
    fn on_milestone(&self, milestone: u32) -> NotifyResult;

    /// Any check-in, including same-day no-ops
    fn on_check_in(&self, _result: &CheckInResult) -> NotifyResult {
        Ok(())
    }
}

/// Notifier that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn on_milestone(&self, _milestone: u32) -> NotifyResult {
        Ok(())
    }
}

/// Notifier that remembers what it was told, for tests and embedders that
/// poll instead of reacting.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    milestones: Mutex<Vec<u32>>,
    outcomes: Mutex<Vec<CheckInOutcome>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every call, then reports failure
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.fail.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn milestones(&self) -> Vec<u32> {
        self.milestones
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn outcomes(&self) -> Vec<CheckInOutcome> {
        self.outcomes
            .lock()
            .map(|o| o.clone())
            .unwrap_or_default()
    }

    fn result(&self) -> NotifyResult {
        if self.fail.load(Ordering::SeqCst) {
            Err(NotifyError::Failed("recording notifier set to fail".into()))
        } else {
            Ok(())
        }
    }
}

impl Notifier for RecordingNotifier {
    fn on_milestone(&self, milestone: u32) -> NotifyResult {
        if let Ok(mut milestones) = self.milestones.lock() {
            milestones.push(milestone);
        }
        self.result()
    }

    fn on_check_in(&self, result: &CheckInResult) -> NotifyResult {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push(result.outcome);
        }
        self.result()
    }
}
