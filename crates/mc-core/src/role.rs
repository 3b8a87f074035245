//! Role catalog and per-session attendee state.
//!
//! The catalog is a fixed, ordered list of roles with default hourly rates.
//! A session never edits the catalog: rate changes live in [`RateOverrides`]
//! and are layered on top with [`apply_rate_overrides`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A class of attendee with an hourly cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRole {
    /// Stable key used in counts, overrides and summaries.
    pub id: String,

    /// Human-friendly label for display.
    pub label: String,

    /// Cost of one attendee for one hour, in the meeting's currency.
    pub hourly_rate: f64,

    /// Optional helper text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MeetingRole {
    pub fn new(id: impl Into<String>, label: impl Into<String>, hourly_rate: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            hourly_rate,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Built-in catalog entries: (id, label, hourly rate, description).
const DEFAULT_ROLES: [(&str, &str, f64, &str); 3] = [
    (
        "senior_leader",
        "Senior Leader",
        240.0,
        "Executives or directors guiding strategy for the session.",
    ),
    (
        "leader_manager",
        "Leader / Manager",
        180.0,
        "People managers or project leads coordinating the work.",
    ),
    (
        "individual_contributor",
        "Individual Contributor",
        120.0,
        "Engineers, designers, analysts, or other makers executing tasks.",
    ),
];

/// Returns the built-in role catalog in display order.
pub fn default_roles() -> Vec<MeetingRole> {
    DEFAULT_ROLES
        .iter()
        .map(|&(id, label, rate, description)| {
            MeetingRole::new(id, label, rate).with_description(description)
        })
        .collect()
}

/// Looks up a role in the built-in catalog.
pub fn find_role(role_id: &str) -> Option<MeetingRole> {
    default_roles().into_iter().find(|role| role.id == role_id)
}

/// Looks up a role in an arbitrary role list.
pub fn find_role_in<'a>(roles: &'a [MeetingRole], role_id: &str) -> Option<&'a MeetingRole> {
    roles.iter().find(|role| role.id == role_id)
}

/// Returns a copy of `roles` with session overrides replacing the hourly rate.
///
/// Roles without an override keep their catalog rate. Overrides for ids not
/// in `roles` are ignored.
pub fn apply_rate_overrides(roles: &[MeetingRole], overrides: &RateOverrides) -> Vec<MeetingRole> {
    roles
        .iter()
        .map(|role| {
            let mut role = role.clone();
            if let Some(rate) = overrides.get(&role.id) {
                role.hourly_rate = rate;
            }
            role
        })
        .collect()
}

/// Attendee count per role id.
///
/// Missing ids read as zero. Counts can never go negative: every mutation
/// clamps at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCounts(BTreeMap<String, u32>);

impl RoleCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates counts with an explicit zero for every role in `roles`.
    pub fn zeroed(roles: &[MeetingRole]) -> Self {
        roles.iter().map(|role| (role.id.clone(), 0)).collect()
    }

    /// Zero for every role in `roles`, then `initial` layered on top.
    pub fn with_initial(roles: &[MeetingRole], initial: &Self) -> Self {
        let mut counts = Self::zeroed(roles);
        for (role_id, count) in initial.iter() {
            counts.0.insert(role_id.to_string(), count);
        }
        counts
    }

    pub fn get(&self, role_id: &str) -> u32 {
        self.0.get(role_id).copied().unwrap_or(0)
    }

    /// Sets an exact count, clamping negative input to zero.
    pub fn set(&mut self, role_id: &str, count: i64) -> u32 {
        let count = u32::try_from(count.max(0)).unwrap_or(u32::MAX);
        self.0.insert(role_id.to_string(), count);
        count
    }

    pub fn increment(&mut self, role_id: &str) -> u32 {
        let count = self.get(role_id).saturating_add(1);
        self.0.insert(role_id.to_string(), count);
        count
    }

    /// Removes one attendee; stays at zero when already empty.
    pub fn decrement(&mut self, role_id: &str) -> u32 {
        let count = self.get(role_id).saturating_sub(1);
        self.0.insert(role_id.to_string(), count);
        count
    }

    /// Total attendees across all roles.
    pub fn total(&self) -> u64 {
        self.0.values().map(|&count| u64::from(count)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(id, &count)| (id.as_str(), count))
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for RoleCounts {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, count)| (id.into(), count)).collect())
    }
}

/// Per-session hourly rate overrides keyed by role id.
///
/// Rates are clamped to zero on the way in, so a stored override is always
/// non-negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateOverrides(BTreeMap<String, f64>);

impl RateOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role_id: &str) -> Option<f64> {
        self.0.get(role_id).copied()
    }

    /// Stores an override and returns the clamped rate that was stored.
    pub fn set(&mut self, role_id: &str, rate: f64) -> f64 {
        // f64::max returns the other operand for NaN, so NaN lands on zero too.
        let rate = rate.max(0.0);
        self.0.insert(role_id.to_string(), rate);
        rate
    }

    /// Drops an override, falling back to the catalog rate.
    pub fn remove(&mut self, role_id: &str) -> Option<f64> {
        self.0.remove(role_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(id, &rate)| (id.as_str(), rate))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for RateOverrides {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (id, rate) in iter {
            overrides.set(&id.into(), rate);
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_ordered_and_unique() {
        let roles = default_roles();
        let ids: Vec<_> = roles.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            ["senior_leader", "leader_manager", "individual_contributor"]
        );
        assert_eq!(roles[0].hourly_rate, 240.0);
        assert!(roles.iter().all(|r| r.description.is_some()));
    }

    #[test]
    fn find_role_returns_catalog_entry_or_none() {
        let ic = find_role("individual_contributor").expect("catalog role");
        assert_eq!(ic.label, "Individual Contributor");
        assert_eq!(ic.hourly_rate, 120.0);
        assert!(find_role("intern").is_none());
    }

    #[test]
    fn overrides_replace_only_matching_rates() {
        let roles = default_roles();
        let overrides: RateOverrides = [("leader_manager", 200.0), ("ghost", 999.0)]
            .into_iter()
            .collect();

        let resolved = apply_rate_overrides(&roles, &overrides);

        assert_eq!(resolved.len(), roles.len());
        assert_eq!(resolved[0].hourly_rate, 240.0);
        assert_eq!(resolved[1].hourly_rate, 200.0);
        assert_eq!(resolved[2].hourly_rate, 120.0);
        // Catalog is untouched.
        assert_eq!(roles[1].hourly_rate, 180.0);
    }

    #[test]
    fn overrides_clamp_negative_and_nan_rates() {
        let mut overrides = RateOverrides::new();
        assert_eq!(overrides.set("a", -50.0), 0.0);
        assert_eq!(overrides.set("b", f64::NAN), 0.0);
        assert_eq!(overrides.get("a"), Some(0.0));
        assert_eq!(overrides.remove("a"), Some(0.0));
        assert_eq!(overrides.get("a"), None);
    }

    #[test]
    fn counts_clamp_at_zero() {
        let mut counts = RoleCounts::new();
        assert_eq!(counts.decrement("a"), 0);
        assert_eq!(counts.set("a", -3), 0);
        assert_eq!(counts.increment("a"), 1);
        assert_eq!(counts.increment("a"), 2);
        assert_eq!(counts.decrement("a"), 1);
        assert_eq!(counts.get("missing"), 0);
    }

    #[test]
    fn counts_with_initial_fill_catalog_zeros() {
        let roles = default_roles();
        let initial: RoleCounts = [("senior_leader", 2), ("guest", 1)].into_iter().collect();

        let counts = RoleCounts::with_initial(&roles, &initial);

        assert_eq!(counts.get("senior_leader"), 2);
        assert_eq!(counts.get("leader_manager"), 0);
        assert_eq!(counts.get("guest"), 1);
        assert_eq!(counts.iter().count(), 4);
        assert_eq!(counts.total(), 3);
    }
}
