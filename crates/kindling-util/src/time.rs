//! Time utilities for kindling
//!
//! Streak arithmetic works on calendar days, never on timestamps: a check-in
//! at 23:59 followed by one at 00:01 is one day apart. Everything that needs
//! "today" or "now" goes through the [`Clock`] trait so the engine can be
//! driven by simulated dates.
//!
//! # Mock Date for Development
//!
//! In debug builds, the `KINDLING_MOCK_DATE` environment variable shifts the
//! [`SystemClock`] to another calendar day. The time of day is still taken
//! from the real clock, so mock time keeps advancing naturally.
//!
//! Format: `YYYY-MM-DD` (e.g., `2025-12-25`)
//!
//! Example:
//! ```bash
//! KINDLING_MOCK_DATE="2025-12-25" kindling check-in
//! ```

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::sync::{Mutex, OnceLock};

/// Environment variable name for mock date (debug builds only)
pub const MOCK_DATE_ENV_VAR: &str = "KINDLING_MOCK_DATE";

/// Calendar-day format used for storage and the command line
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Cached whole-day offset between the mock date and the real date at
/// process start.
static MOCK_DAY_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // This is the internal implementation that wraps Local::now()
fn get_mock_day_offset() -> Option<chrono::Duration> {
    *MOCK_DAY_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_date_str) = std::env::var(MOCK_DATE_ENV_VAR) {
                match parse_day(&mock_date_str) {
                    Some(mock_day) => {
                        let real_day = chrono::Local::now().date_naive();
                        let offset = chrono::Duration::days(days_between(real_day, mock_day));
                        tracing::info!(
                            mock_date = %mock_date_str,
                            offset_days = offset.num_days(),
                            "Mock date enabled"
                        );
                        return Some(offset);
                    }
                    None => {
                        tracing::warn!(
                            mock_date = %mock_date_str,
                            expected_format = DAY_FORMAT,
                            "Invalid mock date format"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether a mock date is currently active.
pub fn is_mock_date_active() -> bool {
    get_mock_day_offset().is_some()
}

/// Source of the current date and time.
pub trait Clock: Send + Sync {
    /// Current local timestamp
    fn now(&self) -> DateTime<Local>;

    /// Current local calendar day, time of day discarded
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The real system clock, respecting `KINDLING_MOCK_DATE` in debug builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::disallowed_methods)] // This is the wrapper that provides mock date support
    fn now(&self) -> DateTime<Local> {
        let real_now = chrono::Local::now();

        if let Some(offset) = get_mock_day_offset() {
            real_now + offset
        } else {
            real_now
        }
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self(at)
    }

    /// Frozen at noon local time on `day`
    pub fn on_day(day: NaiveDate) -> Self {
        Self(local_noon(day))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self { now: Mutex::new(at) }
    }

    /// Starts at noon local time on `day`
    pub fn on_day(day: NaiveDate) -> Self {
        Self::new(local_noon(day))
    }

    /// Jump to noon on `day`
    pub fn set_day(&self, day: NaiveDate) {
        *self.lock() = local_noon(day);
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.lock();
        *now += chrono::Duration::days(days);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Local>> {
        // A poisoned clock still holds a valid timestamp
        self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.lock()
    }
}

/// Noon local time on `day`. Noon avoids DST transitions, which happen at night.
pub fn local_noon(day: NaiveDate) -> DateTime<Local> {
    let naive = NaiveDateTime::new(day, NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}

/// Signed number of whole calendar days from `from` to `to`.
///
/// Positive when `to` is later, zero on the same day, negative when `to`
/// lies before `from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Parse a `YYYY-MM-DD` calendar day
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DAY_FORMAT).ok()
}

/// Format a calendar day as `YYYY-MM-DD`
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Format a timestamp for display with full date and time.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(day(2024, 1, 1), day(2024, 1, 1)), 0);
        assert_eq!(days_between(day(2024, 1, 1), day(2024, 1, 2)), 1);
        assert_eq!(days_between(day(2024, 1, 1), day(2024, 1, 5)), 4);
        assert_eq!(days_between(day(2024, 1, 5), day(2024, 1, 1)), -4);
    }

    #[test]
    fn test_days_between_crosses_month_and_leap_day() {
        assert_eq!(days_between(day(2024, 1, 31), day(2024, 2, 1)), 1);
        assert_eq!(days_between(day(2024, 2, 28), day(2024, 3, 1)), 2);
        assert_eq!(days_between(day(2023, 12, 31), day(2024, 1, 1)), 1);
    }

    #[test]
    fn test_parse_and_format_day() {
        let d = parse_day("2025-12-25").unwrap();
        assert_eq!(d, day(2025, 12, 25));
        assert_eq!(format_day(d), "2025-12-25");

        assert_eq!(parse_day(" 2025-01-01 "), Some(day(2025, 1, 1)));
    }

    #[test]
    fn test_parse_day_invalid_formats() {
        let invalid = [
            "2025/12/25",
            "25-12-2025",
            "2025-13-01",
            "2025-02-30",
            "2025-12-25 14:30:00",
            "",
            "not a date",
        ];

        for s in &invalid {
            assert!(parse_day(s).is_none(), "Expected '{}' to fail parsing", s);
        }
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::on_day(day(2024, 3, 10));
        assert_eq!(clock.today(), day(2024, 3, 10));
        assert_eq!(clock.now().hour(), 12);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::on_day(day(2024, 1, 30));
        assert_eq!(clock.today(), day(2024, 1, 30));

        clock.advance_days(1);
        assert_eq!(clock.today(), day(2024, 1, 31));

        clock.advance_days(2);
        assert_eq!(clock.today(), day(2024, 2, 2));

        clock.set_day(day(2025, 6, 1));
        assert_eq!(clock.today(), day(2025, 6, 1));
    }

    #[test]
    fn test_system_clock_returns_time() {
        let t = SystemClock.now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }

    #[test]
    fn test_format_datetime_full() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 45).unwrap();
        assert_eq!(format_datetime_full(&dt), "2025-12-25 14:30:45");
    }

    #[test]
    fn test_mock_date_env_var_name() {
        assert_eq!(MOCK_DATE_ENV_VAR, "KINDLING_MOCK_DATE");
    }

    #[test]
    #[cfg(debug_assertions)]
    fn test_mock_date_follows_environment() {
        let expected = std::env::var(MOCK_DATE_ENV_VAR)
            .ok()
            .and_then(|s| parse_day(&s))
            .is_some();
        assert_eq!(is_mock_date_active(), expected);
    }
}
