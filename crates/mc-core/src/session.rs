//! Live meeting session state.
//!
//! [`SessionController`] owns everything that changes during a meeting: the
//! snapshot, run state, attendee counts, rate overrides and history. All
//! mutation goes through its methods; the pure helpers in `cost`, `history`
//! and `summary` do the arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cost::{self, MeetingCostSnapshot};
use crate::error::CostError;
use crate::history::{CostHistory, CostHistoryPoint};
use crate::role::{
    MeetingRole, RateOverrides, RoleCounts, apply_rate_overrides, default_roles, find_role_in,
};
use crate::summary::{MeetingSummary, build_summary_at};

/// Meeting time applied by one tick.
pub const SECONDS_PER_TICK: f64 = 1.0;

/// Whether ticks currently advance the meeting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Paused,
    Running,
}

/// Authoritative state for one meeting.
#[derive(Debug, Clone)]
pub struct SessionController {
    catalog: Vec<MeetingRole>,
    overrides: RateOverrides,
    counts: RoleCounts,
    snapshot: MeetingCostSnapshot,
    history: CostHistory,
    state: RunState,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(default_roles())
    }
}

impl SessionController {
    /// Creates a paused session with zero attendees for every catalog role.
    pub fn new(catalog: Vec<MeetingRole>) -> Self {
        let counts = RoleCounts::zeroed(&catalog);
        Self {
            catalog,
            overrides: RateOverrides::new(),
            counts,
            snapshot: MeetingCostSnapshot::empty(),
            history: CostHistory::new(),
            state: RunState::Paused,
        }
    }

    /// Creates a paused session seeded with `initial` attendees.
    pub fn with_initial_counts(catalog: Vec<MeetingRole>, initial: &RoleCounts) -> Self {
        let mut session = Self::new(catalog);
        for (role_id, count) in initial.iter() {
            session.set_role_count(role_id, i64::from(count));
        }
        session
    }

    /// Applies rate overrides on top of any already set.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &RateOverrides) -> Self {
        for (role_id, rate) in overrides.iter() {
            self.set_role_rate(role_id, rate);
        }
        self
    }

    // ========== Read accessors ==========

    pub const fn snapshot(&self) -> &MeetingCostSnapshot {
        &self.snapshot
    }

    pub const fn total_seconds(&self) -> f64 {
        self.snapshot.total_seconds
    }

    pub const fn total_cost(&self) -> f64 {
        self.snapshot.total_cost
    }

    /// Burn rate recorded at the last tick.
    pub const fn cost_per_second(&self) -> f64 {
        self.snapshot.cost_per_second
    }

    /// Burn rate of the attendee mix right now, which may differ from the
    /// snapshot until the next tick lands.
    pub fn current_rate(&self) -> f64 {
        cost::cost_per_second(&self.counts, &self.effective_roles())
    }

    pub const fn role_counts(&self) -> &RoleCounts {
        &self.counts
    }

    pub const fn rate_overrides(&self) -> &RateOverrides {
        &self.overrides
    }

    pub const fn history(&self) -> &CostHistory {
        &self.history
    }

    pub const fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn catalog(&self) -> &[MeetingRole] {
        &self.catalog
    }

    /// Catalog roles with this session's rate overrides applied.
    pub fn effective_roles(&self) -> Vec<MeetingRole> {
        apply_rate_overrides(&self.catalog, &self.overrides)
    }

    /// A single catalog role with its effective rate.
    pub fn role(&self, role_id: &str) -> Result<MeetingRole, CostError> {
        let role = find_role_in(&self.catalog, role_id).ok_or_else(|| CostError::UnknownRole {
            role_id: role_id.to_string(),
        })?;
        let mut role = role.clone();
        if let Some(rate) = self.overrides.get(role_id) {
            role.hourly_rate = rate;
        }
        Ok(role)
    }

    // ========== Timer control ==========

    pub fn start(&mut self) {
        if self.state == RunState::Running {
            return;
        }
        self.state = RunState::Running;
        tracing::debug!(total_seconds = self.snapshot.total_seconds, "session started");
    }

    /// Stops ticks from applying. Counts and totals are kept.
    pub fn pause(&mut self) {
        if self.state == RunState::Paused {
            return;
        }
        self.state = RunState::Paused;
        tracing::debug!(total_seconds = self.snapshot.total_seconds, "session paused");
    }

    /// Pauses and zeroes the clock and history. Attendees and rates are left
    /// as they are.
    pub fn reset(&mut self) {
        self.state = RunState::Paused;
        self.snapshot = MeetingCostSnapshot::empty();
        self.history.clear();
        tracing::debug!("session reset");
    }

    // ========== Attendees and rates ==========

    /// Sets an exact attendee count; negative input becomes zero.
    pub fn set_role_count(&mut self, role_id: &str, count: i64) -> u32 {
        let count = self.counts.set(role_id, count);
        tracing::debug!(role_id, count, "role count set");
        count
    }

    pub fn increment_role(&mut self, role_id: &str) -> u32 {
        let count = self.counts.increment(role_id);
        tracing::debug!(role_id, count, "role incremented");
        count
    }

    /// Removes one attendee, never going below zero.
    pub fn decrement_role(&mut self, role_id: &str) -> u32 {
        let count = self.counts.decrement(role_id);
        tracing::debug!(role_id, count, "role decremented");
        count
    }

    /// Overrides a role's hourly rate for this session; negative input
    /// becomes zero.
    pub fn set_role_rate(&mut self, role_id: &str, rate: f64) -> f64 {
        let rate = self.overrides.set(role_id, rate);
        tracing::debug!(role_id, rate, "role rate overridden");
        rate
    }

    /// Reverts a role to its catalog rate.
    pub fn clear_role_rate(&mut self, role_id: &str) {
        if self.overrides.remove(role_id).is_some() {
            tracing::debug!(role_id, "role rate override cleared");
        }
    }

    // ========== Ticks ==========

    /// Applies one standard tick. See [`Self::apply_tick`].
    pub fn tick(&mut self) -> Result<Option<CostHistoryPoint>, CostError> {
        self.apply_tick(SECONDS_PER_TICK)
    }

    /// Advances the meeting by `seconds` at the current mix and records the
    /// sample.
    ///
    /// Returns `Ok(None)` without touching any state while paused.
    pub fn apply_tick(&mut self, seconds: f64) -> Result<Option<CostHistoryPoint>, CostError> {
        if self.state == RunState::Paused {
            tracing::debug!(seconds, "tick ignored while paused");
            return Ok(None);
        }

        let roles = self.effective_roles();
        self.snapshot = cost::advance(self.snapshot, seconds, &self.counts, &roles)?;

        let point = CostHistoryPoint::from(self.snapshot);
        self.history.push(point);
        tracing::trace!(
            total_seconds = point.elapsed_seconds,
            total_cost = point.total_cost,
            cost_per_second = point.cost_per_second,
            "tick applied"
        );
        Ok(Some(point))
    }

    // ========== Summaries ==========

    /// Summary of the session as of now, including the history window.
    pub fn summary(&self) -> MeetingSummary {
        self.summary_at(Utc::now())
    }

    pub fn summary_at(&self, generated_at: DateTime<Utc>) -> MeetingSummary {
        build_summary_at(
            &self.snapshot,
            &self.counts,
            &self.effective_roles(),
            Some(&self.history),
            generated_at,
        )
    }
}
