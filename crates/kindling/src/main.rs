//! kindling - daily check-in streaks from the terminal
//!
//! Wires together:
//! - Configuration loading
//! - Store initialization
//! - The streak tracker
//! - Console output and milestone notifications

mod notifier;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use kindling_config::load_config_or_default;
use kindling_core::{
    CheckInOutcome, CheckInResult, ClaimOutcome, GoalProgress, StreakStatus, StreakTracker,
};
use kindling_store::{Goal, HistoryEvent, HistoryEventType, SqliteStore, StreakStore};
use kindling_util::{
    default_config_path, format_datetime_full, format_day, is_mock_date_active, parse_day, Clock,
    SystemClock,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::notifier::ConsoleNotifier;

/// kindling - Keep a daily streak going
#[derive(Parser, Debug)]
#[command(name = "kindling")]
#[command(about = "Daily check-in streaks, milestone rewards, and a goals checklist", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/kindling/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set KINDLING_DATA_DIR env var)
    #[arg(short, long, env = "KINDLING_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check in for today, or for the given day
    CheckIn {
        /// Day to check in for (YYYY-MM-DD)
        #[arg(long, value_parser = parse_day_arg)]
        date: Option<NaiveDate>,
    },

    /// Show the current streak
    Status,

    /// Show recent check-ins, milestones, and claims
    History {
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },

    /// Milestone rewards
    #[command(subcommand)]
    Rewards(RewardsCommand),

    /// Daily goals checklist
    #[command(subcommand)]
    Goals(GoalsCommand),
}

#[derive(Subcommand, Debug)]
enum RewardsCommand {
    /// List unlocked rewards
    List,

    /// Claim the reward for a milestone
    Claim { milestone: u32 },
}

#[derive(Subcommand, Debug)]
enum GoalsCommand {
    /// List goals
    List,

    /// Add a goal
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Mark the goal as important
        #[arg(short, long)]
        important: bool,
    },

    /// Mark a goal completed
    Done { id: String },

    /// Mark a goal not completed
    Undo { id: String },

    /// Toggle the important flag
    Star { id: String },

    /// Replace a goal's text
    Edit {
        id: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete a goal
    Rm { id: String },
}

fn parse_day_arg(s: &str) -> Result<NaiveDate, String> {
    parse_day(s).ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

fn open_tracker(args: &Args) -> Result<StreakTracker> {
    let mut settings = load_config_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    if let Some(dir) = &args.data_dir {
        settings.service.data_dir = dir.clone();
    }

    std::fs::create_dir_all(&settings.service.data_dir).with_context(|| {
        format!(
            "Failed to create data directory {:?}",
            settings.service.data_dir
        )
    })?;

    let db_path = settings.service.database_path();
    let store: Arc<dyn StreakStore> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open store at {:?}", db_path))?,
    );

    info!(
        config_path = %args.config.display(),
        db_path = %db_path.display(),
        milestones = ?settings.milestones.as_slice(),
        "Store opened"
    );

    let tracker = StreakTracker::open(
        store,
        Arc::new(SystemClock),
        Arc::new(ConsoleNotifier::new(args.json)),
        settings.milestones.clone(),
    )
    .context("Failed to load streak record")?
    .with_goal_rules(settings.goals);

    Ok(tracker)
}

fn run(tracker: &mut StreakTracker, command: Command, json: bool) -> Result<()> {
    match command {
        Command::CheckIn { date } => {
            let result = match date {
                Some(day) => tracker.check_in(day)?,
                None => tracker.check_in_now()?,
            };
            if json {
                print_json(&result)?;
            } else {
                print_check_in(&result);
            }
        }

        Command::Status => {
            let status = tracker.status_now();
            if json {
                print_json(&status)?;
            } else {
                print_status(&status);
            }
        }

        Command::History { limit } => {
            let events = tracker.history(limit)?;
            if json {
                print_json(&events)?;
            } else {
                print_history(&events);
            }
        }

        Command::Rewards(RewardsCommand::List) => {
            let rewards: Vec<RewardView> = tracker
                .rewards()
                .map(|(milestone, reward)| RewardView {
                    milestone,
                    unlocked_at: format_datetime_full(&reward.unlocked_at),
                    claimed: reward.claimed,
                })
                .collect();
            if json {
                print_json(&rewards)?;
            } else if rewards.is_empty() {
                println!("No rewards unlocked yet.");
            } else {
                for reward in &rewards {
                    let mark = if reward.claimed { "claimed" } else { "unclaimed" };
                    println!(
                        "{:>4} days  {}  ({})",
                        reward.milestone, reward.unlocked_at, mark
                    );
                }
            }
        }

        Command::Rewards(RewardsCommand::Claim { milestone }) => {
            let outcome = tracker.claim_reward(milestone)?;
            if json {
                return print_json(&ClaimView { milestone, outcome });
            }
            match outcome {
                ClaimOutcome::Claimed => println!("Reward for {milestone} days claimed. Enjoy!"),
                ClaimOutcome::AlreadyClaimed => {
                    println!("Reward for {milestone} days was already claimed.")
                }
            }
        }

        Command::Goals(goals) => run_goals(tracker, goals, json)?,
    }

    Ok(())
}

fn run_goals(tracker: &mut StreakTracker, command: GoalsCommand, json: bool) -> Result<()> {
    let (verb, goal) = match command {
        GoalsCommand::List => {
            if json {
                print_json(&tracker.goals())?;
            } else {
                print_goals(&tracker.goals(), &tracker.goal_progress());
            }
            return Ok(());
        }

        GoalsCommand::Add { text, important } => {
            ("Added", tracker.add_goal(&text.join(" "), important)?)
        }

        GoalsCommand::Done { id } => {
            let id = tracker.resolve_goal(&id)?;
            ("Completed", tracker.set_goal_completed(&id, true)?)
        }

        GoalsCommand::Undo { id } => {
            let id = tracker.resolve_goal(&id)?;
            ("Reopened", tracker.set_goal_completed(&id, false)?)
        }

        GoalsCommand::Star { id } => {
            let id = tracker.resolve_goal(&id)?;
            ("Updated", tracker.toggle_goal_important(&id)?)
        }

        GoalsCommand::Edit { id, text } => {
            let id = tracker.resolve_goal(&id)?;
            ("Renamed", tracker.rename_goal(&id, &text.join(" "))?)
        }

        GoalsCommand::Rm { id } => {
            let id = tracker.resolve_goal(&id)?;
            ("Deleted", tracker.delete_goal(&id)?)
        }
    };

    if json {
        return print_json(&goal);
    }

    println!("{} {}", verb, describe_goal(&goal));
    let progress = tracker.goal_progress();
    println!(
        "{}/{} goals done ({:.0}%)",
        progress.completed, progress.total, progress.percent
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct ClaimView {
    milestone: u32,
    outcome: ClaimOutcome,
}

#[derive(Debug, Serialize)]
struct RewardView {
    milestone: u32,
    unlocked_at: String,
    claimed: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", out);
    Ok(())
}

fn print_check_in(result: &CheckInResult) {
    let day = format_day(result.day);
    match result.outcome {
        CheckInOutcome::FirstCheckIn => {
            println!("Checked in for {day}. Your streak starts today!")
        }
        CheckInOutcome::AlreadyCheckedInToday => {
            println!("Already checked in for {day}.")
        }
        CheckInOutcome::StreakExtended { new_current } => {
            println!("Checked in for {day}. Streak: {new_current} days 🔥")
        }
        CheckInOutcome::StreakReset { .. } => {
            println!("Checked in for {day}. Fresh start: day 1.")
        }
    }
}

fn print_status(status: &StreakStatus) {
    println!("Current streak: {} days", status.current);
    println!("Longest streak: {} days", status.longest);
    match status.last_check_in {
        Some(day) => println!("Last check-in:  {}", format_day(day)),
        None => println!("Last check-in:  never"),
    }

    if status.checked_in_today {
        println!("Checked in today ✓");
    } else {
        println!("Not checked in today");
    }
    println!("Active days:    {}", status.active_days);

    let left = status.days_to_next_milestone();
    if left > 0 {
        println!("Next milestone: {} days ({} to go)", status.next_milestone, left);
    }

    let markers: Vec<String> = status
        .markers
        .iter()
        .map(|m| {
            if m.reached {
                format!("[{}]", m.milestone)
            } else {
                m.milestone.to_string()
            }
        })
        .collect();
    println!("Milestones:     {}", markers.join(" "));

    if !status.unclaimed_rewards.is_empty() {
        let unclaimed: Vec<String> = status
            .unclaimed_rewards
            .iter()
            .map(|m| m.to_string())
            .collect();
        println!("Unclaimed rewards: {}", unclaimed.join(", "));
    }
}

fn print_history(events: &[HistoryEvent]) {
    if events.is_empty() {
        println!("No history yet.");
        return;
    }

    for event in events {
        let when = format_datetime_full(&event.timestamp);
        let what = match &event.event {
            HistoryEventType::CheckedIn { day, kind, current } => format!(
                "check-in {} ({:?}, streak {})",
                format_day(*day),
                kind,
                current
            ),
            HistoryEventType::MilestoneReached { milestone, day } => {
                format!("milestone {} reached on {}", milestone, format_day(*day))
            }
            HistoryEventType::RewardClaimed { milestone } => {
                format!("reward for {} days claimed", milestone)
            }
        };
        println!("{}  {}", when, what);
    }
}

fn print_goals(goals: &[&Goal], progress: &GoalProgress) {
    if goals.is_empty() {
        println!("No goals yet. Add one with `kindling goals add <text>`.");
        return;
    }

    for goal in goals {
        println!("{}", describe_goal(goal));
    }
    println!(
        "{}/{} goals done ({:.0}%)",
        progress.completed, progress.total, progress.percent
    );
}

fn describe_goal(goal: &Goal) -> String {
    let check = if goal.completed { "[x]" } else { "[ ]" };
    let star = if goal.important { "★ " } else { "" };
    let short_id: String = goal.id.to_string().chars().take(8).collect();
    format!("{} {}  {}{}", check, short_id, star, goal.text)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "kindling starting");

    if is_mock_date_active() {
        warn!(
            "Mock date active: check-ins use {} instead of the real date",
            format_day(SystemClock.today())
        );
    }

    let mut tracker = open_tracker(&args)?;
    run(&mut tracker, args.command, args.json)
}
