//! Integration tests for kindling
//!
//! These tests drive the tracker over the SQLite store with configuration
//! loaded from disk, the way the binary wires it.

use chrono::NaiveDate;
use kindling_config::{parse_config, Milestones, Settings};
use kindling_core::{
    CheckInOutcome, ClaimOutcome, MilestoneReached, NullNotifier, RecordingNotifier,
    StreakError, StreakTracker,
};
use kindling_store::{CheckInKind, HistoryEventType, SqliteStore, StreakStore};
use kindling_util::ManualClock;
use std::sync::Arc;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn small_settings() -> Settings {
    parse_config(
        r#"
        config_version = 1

        [streak]
        milestones = [3, 7, 14]

        [goals]
        max_text_len = 40
        "#,
    )
    .unwrap()
}

fn open_tracker(
    store: Arc<dyn StreakStore>,
    clock: Arc<ManualClock>,
    notifier: Arc<RecordingNotifier>,
    settings: &Settings,
) -> StreakTracker {
    StreakTracker::open(store, clock, notifier, settings.milestones.clone())
        .unwrap()
        .with_goal_rules(settings.goals)
}

#[test]
fn test_streak_scenario_over_sqlite() {
    let settings = small_settings();
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let clock = Arc::new(ManualClock::on_day(day(2024, 1, 1)));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut tracker = open_tracker(store.clone(), clock.clone(), notifier.clone(), &settings);

    let first = tracker.check_in_now().unwrap();
    assert_eq!(first.outcome, CheckInOutcome::FirstCheckIn);

    clock.advance_days(1);
    let second = tracker.check_in_now().unwrap();
    assert_eq!(second.outcome, CheckInOutcome::StreakExtended { new_current: 2 });

    clock.advance_days(1);
    let third = tracker.check_in_now().unwrap();
    assert_eq!(third.outcome, CheckInOutcome::StreakExtended { new_current: 3 });
    assert_eq!(third.milestones, vec![MilestoneReached { milestone: 3 }]);

    // Skip a day
    clock.advance_days(2);
    let fifth = tracker.check_in_now().unwrap();
    assert_eq!(fifth.outcome, CheckInOutcome::StreakReset { previous_current: 3 });

    let record = store.load().unwrap();
    assert_eq!(record.current, 1);
    assert_eq!(record.longest, 3);
    assert_eq!(record.last_check_in, Some(day(2024, 1, 5)));
    assert!(record.rewards.contains_key(&3));
    assert_eq!(notifier.milestones(), vec![3]);

    let status = tracker.status_now();
    assert!(status.checked_in_today);
    assert_eq!(status.active_days, 4);
    assert_eq!(status.next_milestone, 3);
    assert_eq!(status.unclaimed_rewards, vec![3]);
}

#[test]
fn test_same_day_repeat_writes_nothing() {
    let settings = small_settings();
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let clock = Arc::new(ManualClock::on_day(day(2024, 4, 1)));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut tracker = open_tracker(store.clone(), clock, notifier, &settings);

    tracker.check_in(day(2024, 4, 1)).unwrap();
    let before = store.load().unwrap();

    for _ in 0..3 {
        let again = tracker.check_in(day(2024, 4, 1)).unwrap();
        assert_eq!(again.outcome, CheckInOutcome::AlreadyCheckedInToday);
    }

    assert_eq!(store.load().unwrap(), before);
    assert_eq!(store.recent_history(10).unwrap().len(), 1);
}

#[test]
fn test_state_survives_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("kindling.db");
    let settings = small_settings();
    let clock = Arc::new(ManualClock::on_day(day(2024, 2, 1)));

    {
        let store = Arc::new(SqliteStore::open(&db_path).unwrap());
        let notifier = Arc::new(RecordingNotifier::new());
        let mut tracker = open_tracker(store, clock.clone(), notifier, &settings);

        tracker.check_in_now().unwrap();
        clock.advance_days(1);
        tracker.check_in_now().unwrap();
        tracker.add_goal("Journal for five minutes", true).unwrap();
    }

    clock.advance_days(1);
    let store = Arc::new(SqliteStore::open(&db_path).unwrap());
    let notifier = Arc::new(RecordingNotifier::new());
    let mut tracker = open_tracker(store.clone(), clock, notifier.clone(), &settings);

    assert_eq!(tracker.record().current, 2);
    assert_eq!(tracker.goals().len(), 1);
    assert!(tracker.goals()[0].important);

    let result = tracker.check_in_now().unwrap();
    assert_eq!(result.outcome, CheckInOutcome::StreakExtended { new_current: 3 });
    assert_eq!(notifier.milestones(), vec![3]);

    assert_eq!(tracker.claim_reward(3).unwrap(), ClaimOutcome::Claimed);
    assert!(store.load().unwrap().rewards[&3].claimed);

    let kinds: Vec<HistoryEventType> = tracker
        .history(10)
        .unwrap()
        .into_iter()
        .map(|e| e.event)
        .collect();
    assert_eq!(kinds.len(), 5);
    assert_eq!(kinds[0], HistoryEventType::RewardClaimed { milestone: 3 });
    assert_eq!(
        kinds[4],
        HistoryEventType::CheckedIn {
            day: day(2024, 2, 1),
            kind: CheckInKind::First,
            current: 1
        }
    );
}

#[test]
fn test_earlier_day_rejected_over_sqlite() {
    let settings = small_settings();
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let clock = Arc::new(ManualClock::on_day(day(2024, 3, 10)));
    let mut tracker = open_tracker(
        store.clone(),
        clock,
        Arc::new(RecordingNotifier::new()),
        &settings,
    );

    tracker.check_in(day(2024, 3, 10)).unwrap();
    let before = store.load().unwrap();

    let err = tracker.check_in(day(2024, 3, 1)).unwrap_err();
    assert!(matches!(err, StreakError::DateBeforeLastCheckIn { .. }));
    assert_eq!(store.load().unwrap(), before);
}

#[test]
fn test_corrupt_database_record_starts_fresh() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("kindling.db");

    let store = SqliteStore::open(&db_path).unwrap();
    store.write_raw_record("{not json").unwrap();
    assert!(store.load().is_err());

    let store = Arc::new(store);
    let clock = Arc::new(ManualClock::on_day(day(2024, 5, 5)));
    let mut tracker = StreakTracker::open(
        store.clone(),
        clock,
        Arc::new(NullNotifier),
        Milestones::default(),
    )
    .unwrap();

    assert!(tracker.record().is_fresh());
    let result = tracker.check_in_now().unwrap();
    assert_eq!(result.outcome, CheckInOutcome::FirstCheckIn);

    // The next save replaced the corrupt bytes
    assert_eq!(store.load().unwrap().current, 1);
}

#[test]
fn test_goal_text_limit_from_config() {
    let settings = small_settings();
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let clock = Arc::new(ManualClock::on_day(day(2024, 1, 1)));
    let mut tracker = open_tracker(store, clock, Arc::new(RecordingNotifier::new()), &settings);

    let long_text = "x".repeat(41);
    assert!(matches!(
        tracker.add_goal(&long_text, false),
        Err(StreakError::Goal(_))
    ));

    let goal = tracker.add_goal(&"x".repeat(40), false).unwrap();
    let prefix: String = goal.id.to_string().chars().take(8).collect();
    assert_eq!(tracker.resolve_goal(&prefix).unwrap(), goal.id);
}
