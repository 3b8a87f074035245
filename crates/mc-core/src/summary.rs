//! Exportable meeting summaries.
//!
//! A [`MeetingSummary`] is a self-describing JSON document meant for sharing
//! or offline analysis. Its field names are a wire contract:
//!
//! ```text
//! generatedAt, totalSeconds, totalCost, costPerSecond,
//! attendees[].{roleId, roleLabel, hourlyRate, count, estimatedCostShare},
//! history?.{points[], note}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cost::MeetingCostSnapshot;
use crate::history::{CostHistory, CostHistoryPoint};
use crate::role::{MeetingRole, RateOverrides, RoleCounts, apply_rate_overrides, default_roles};

/// Suggested file name for an exported summary.
pub const DEFAULT_SUMMARY_FILENAME: &str = "meeting-summary.json";

/// Attached to every embedded history excerpt.
pub const HISTORY_NOTE: &str =
    "Recent cost samples; this is a sliding window, not a full audit log.";

/// Point-in-time report of a meeting's cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSummary {
    /// When the summary was built (UTC, millisecond precision).
    #[serde(with = "iso_millis")]
    pub generated_at: DateTime<Utc>,
    pub total_seconds: f64,
    pub total_cost: f64,
    pub cost_per_second: f64,
    /// One entry per role, in catalog order.
    pub attendees: Vec<AttendeeSummary>,
    /// Absent entirely when no history was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<SummaryHistory>,
}

/// A role's attendance and its attributed slice of the total cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeSummary {
    pub role_id: String,
    pub role_label: String,
    pub hourly_rate: f64,
    pub count: u32,
    /// `total_cost` weighted by this role's share of Σ(rate × count).
    pub estimated_cost_share: f64,
}

/// History excerpt embedded in a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryHistory {
    pub points: Vec<CostHistoryPoint>,
    pub note: String,
}

impl MeetingSummary {
    /// Serializes as indented UTF-8 JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Splits `snapshot.total_cost` across roles by rate × count.
///
/// Every share is zero when nothing is owed or nobody is weighted, so the
/// division below never sees a zero denominator.
fn estimated_shares(
    snapshot: &MeetingCostSnapshot,
    counts: &RoleCounts,
    roles: &[MeetingRole],
) -> Vec<f64> {
    let weights: Vec<f64> = roles
        .iter()
        .map(|role| role.hourly_rate * f64::from(counts.get(&role.id)))
        .collect();
    let total_weight = weights.iter().fold(0.0, |total, weight| total + weight);

    if total_weight == 0.0 || snapshot.total_cost == 0.0 {
        return vec![0.0; roles.len()];
    }

    weights
        .into_iter()
        .map(|weight| weight / total_weight * snapshot.total_cost)
        .collect()
}

/// Builds a summary stamped with the current time.
pub fn build_summary(
    snapshot: &MeetingCostSnapshot,
    counts: &RoleCounts,
    roles: &[MeetingRole],
    history: Option<&CostHistory>,
) -> MeetingSummary {
    build_summary_at(snapshot, counts, roles, history, Utc::now())
}

/// Builds a summary stamped with `generated_at`.
pub fn build_summary_at(
    snapshot: &MeetingCostSnapshot,
    counts: &RoleCounts,
    roles: &[MeetingRole],
    history: Option<&CostHistory>,
    generated_at: DateTime<Utc>,
) -> MeetingSummary {
    let shares = estimated_shares(snapshot, counts, roles);

    let attendees = roles
        .iter()
        .zip(shares)
        .map(|(role, share)| AttendeeSummary {
            role_id: role.id.clone(),
            role_label: role.label.clone(),
            hourly_rate: role.hourly_rate,
            count: counts.get(&role.id),
            estimated_cost_share: share,
        })
        .collect();

    let history = history
        .filter(|history| !history.is_empty())
        .map(|history| SummaryHistory {
            points: history.to_vec(),
            note: HISTORY_NOTE.to_string(),
        });

    MeetingSummary {
        generated_at,
        total_seconds: snapshot.total_seconds,
        total_cost: snapshot.total_cost,
        cost_per_second: snapshot.cost_per_second,
        attendees,
        history,
    }
}

/// Builds a summary against the built-in catalog with optional overrides.
pub fn build_summary_with_defaults(
    snapshot: &MeetingCostSnapshot,
    counts: &RoleCounts,
    history: Option<&CostHistory>,
    overrides: Option<&RateOverrides>,
) -> MeetingSummary {
    let catalog = default_roles();
    let roles = match overrides {
        Some(overrides) => apply_rate_overrides(&catalog, overrides),
        None => catalog,
    };
    build_summary(snapshot, counts, &roles, history)
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
