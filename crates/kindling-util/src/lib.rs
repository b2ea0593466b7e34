//! Shared utilities for kindling
//!
//! This crate provides:
//! - ID types (GoalId)
//! - Clock abstraction (system, fixed, and manually advanced clocks)
//! - Calendar-day arithmetic
//! - Default paths for config and data directories

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
