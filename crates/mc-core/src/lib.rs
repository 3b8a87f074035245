//! Core domain logic for the meeting cost timer.
//!
//! This crate contains the fundamental types and logic for:
//! - Roles: the attendee catalog and per-session rate overrides
//! - Cost accounting: turning attendee mix and elapsed time into a snapshot
//! - History: the bounded window of recent samples used for trends
//! - Summaries: the exportable JSON report
//! - Sessions: the controller that owns the live state and applies ticks

pub mod clock;
mod cost;
mod error;
pub mod history;
pub mod role;
mod session;
pub mod summary;

pub use clock::{DriveStats, ScriptedTicks, SharedSession, TickSource, drive};
pub use cost::{MeetingCostSnapshot, SECONDS_PER_HOUR, advance, cost_per_second};
pub use error::CostError;
pub use history::{CostHistory, CostHistoryPoint, HISTORY_LIMIT};
pub use role::{
    MeetingRole, RateOverrides, RoleCounts, apply_rate_overrides, default_roles, find_role,
    find_role_in,
};
pub use session::{RunState, SECONDS_PER_TICK, SessionController};
pub use summary::{
    AttendeeSummary, DEFAULT_SUMMARY_FILENAME, HISTORY_NOTE, MeetingSummary, SummaryHistory,
    build_summary, build_summary_at, build_summary_with_defaults,
};
