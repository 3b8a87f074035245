//! Meeting cost accounting.
//!
//! The burn rate is recomputed from the current attendee mix on every tick,
//! while the totals integrate additively:
//!
//! ```text
//! rate       = Σ(hourly_rate × count) / 3600
//! total_cost = Σ(rate at tick × seconds in tick)
//! ```
//!
//! A mix change therefore applies from the next tick onward, never
//! retroactively. A tick that spans several mix changes charges the whole
//! interval at the mix present when it fires.

use serde::{Deserialize, Serialize};

use crate::error::CostError;
use crate::role::{MeetingRole, RoleCounts};

pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Accumulated time and cost of a meeting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingCostSnapshot {
    /// Cumulative elapsed meeting time.
    pub total_seconds: f64,

    /// Cumulative cost.
    pub total_cost: f64,

    /// Burn rate for the attendee mix at the latest tick.
    pub cost_per_second: f64,
}

impl MeetingCostSnapshot {
    /// A snapshot with every field at zero.
    pub const fn empty() -> Self {
        Self {
            total_seconds: 0.0,
            total_cost: 0.0,
            cost_per_second: 0.0,
        }
    }

    /// See [`advance`].
    pub fn advance(
        &self,
        seconds_elapsed: f64,
        counts: &RoleCounts,
        roles: &[MeetingRole],
    ) -> Result<Self, CostError> {
        advance(*self, seconds_elapsed, counts, roles)
    }
}

/// Instantaneous cost per second for an attendee mix.
///
/// Only roles in `roles` are charged; ids in `counts` without a role
/// contribute nothing.
pub fn cost_per_second(counts: &RoleCounts, roles: &[MeetingRole]) -> f64 {
    // fold from +0.0 so an empty mix never yields -0.0
    let hourly = roles.iter().fold(0.0, |total, role| {
        total + role.hourly_rate * f64::from(counts.get(&role.id))
    });
    hourly / SECONDS_PER_HOUR
}

/// Advances `previous` by `seconds_elapsed` at the rate of the current mix.
///
/// Zero elapsed seconds leaves the totals unchanged but still refreshes
/// `cost_per_second`.
pub fn advance(
    previous: MeetingCostSnapshot,
    seconds_elapsed: f64,
    counts: &RoleCounts,
    roles: &[MeetingRole],
) -> Result<MeetingCostSnapshot, CostError> {
    if !seconds_elapsed.is_finite() {
        return Err(CostError::NonFiniteElapsed {
            seconds: seconds_elapsed,
        });
    }
    if seconds_elapsed < 0.0 {
        return Err(CostError::NegativeElapsed {
            seconds: seconds_elapsed,
        });
    }

    let rate = cost_per_second(counts, roles);
    #[allow(clippy::suboptimal_flops)]
    let total_cost = previous.total_cost + rate * seconds_elapsed;
    Ok(MeetingCostSnapshot {
        total_seconds: previous.total_seconds + seconds_elapsed,
        total_cost,
        cost_per_second: rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::default_roles;

    const EPSILON: f64 = 1e-9;

    fn custom_roles() -> Vec<MeetingRole> {
        vec![
            MeetingRole::new("a", "A", 100.0),
            MeetingRole::new("b", "B", 200.0),
        ]
    }

    fn counts(pairs: &[(&str, u32)]) -> RoleCounts {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_inputs_cost_nothing() {
        assert_eq!(cost_per_second(&RoleCounts::new(), &default_roles()), 0.0);
        assert_eq!(cost_per_second(&counts(&[("senior_leader", 3)]), &[]), 0.0);
        assert_eq!(
            cost_per_second(
                &counts(&[("senior_leader", 0), ("leader_manager", 0)]),
                &default_roles()
            ),
            0.0
        );
        assert!(cost_per_second(&RoleCounts::new(), &[]).is_sign_positive());
    }

    #[test]
    fn converts_hourly_rate_to_per_second() {
        let rate = cost_per_second(&counts(&[("senior_leader", 1)]), &default_roles());
        assert!((rate - 240.0 / 3600.0).abs() < EPSILON);
    }

    #[test]
    fn aggregates_roles_and_counts() {
        let rate = cost_per_second(&counts(&[("a", 2), ("b", 1)]), &custom_roles());
        assert!((rate - 400.0 / 3600.0).abs() < EPSILON);
    }

    #[test]
    fn unknown_role_ids_contribute_zero() {
        let rate = cost_per_second(&counts(&[("a", 1), ("stranger", 50)]), &custom_roles());
        assert!((rate - 100.0 / 3600.0).abs() < EPSILON);
    }

    #[test]
    fn two_minutes_with_two_attendees() {
        let roles = vec![MeetingRole::new("a", "A", 100.0)];
        let mix = counts(&[("a", 2)]);

        let snapshot = advance(MeetingCostSnapshot::empty(), 120.0, &mix, &roles).unwrap();

        assert!((snapshot.cost_per_second - 200.0 / 3600.0).abs() < EPSILON);
        assert_eq!(snapshot.total_seconds, 120.0);
        assert!((snapshot.total_cost - 20.0 / 3.0).abs() < EPSILON);
    }

    #[test]
    fn zero_elapsed_keeps_totals_but_refreshes_rate() {
        let previous = MeetingCostSnapshot {
            total_seconds: 30.0,
            total_cost: 4.5,
            cost_per_second: 0.0,
        };
        let mix = counts(&[("b", 1)]);

        let next = previous.advance(0.0, &mix, &custom_roles()).unwrap();

        assert_eq!(next.total_seconds, 30.0);
        assert_eq!(next.total_cost, 4.5);
        assert!((next.cost_per_second - 200.0 / 3600.0).abs() < EPSILON);
    }

    #[test]
    fn untouched_empty_snapshot_when_nothing_elapsed() {
        let next = advance(
            MeetingCostSnapshot::empty(),
            0.0,
            &RoleCounts::new(),
            &default_roles(),
        )
        .unwrap();
        assert_eq!(next, MeetingCostSnapshot::default());
    }

    #[test]
    fn accumulates_across_ticks_with_changing_mix() {
        let roles = default_roles();
        let first_mix = counts(&[("leader_manager", 1)]);
        let second_mix = counts(&[("leader_manager", 1), ("senior_leader", 1)]);

        let first = advance(MeetingCostSnapshot::empty(), 30.0, &first_mix, &roles).unwrap();
        let second = advance(first, 45.0, &second_mix, &roles).unwrap();

        let expected =
            cost_per_second(&first_mix, &roles) * 30.0 + cost_per_second(&second_mix, &roles) * 45.0;
        assert_eq!(first.total_seconds, 30.0);
        assert_eq!(second.total_seconds, 75.0);
        assert!((second.total_cost - expected).abs() < EPSILON);
    }

    #[test]
    fn advance_is_pure() {
        let roles = custom_roles();
        let mix = counts(&[("a", 3), ("b", 2)]);
        let start = MeetingCostSnapshot {
            total_seconds: 10.0,
            total_cost: 1.0,
            cost_per_second: 0.1,
        };

        let first = advance(start, 7.0, &mix, &roles).unwrap();
        let second = advance(start, 7.0, &mix, &roles).unwrap();

        assert_eq!(first, second);
        assert_eq!(start.total_seconds, 10.0);
    }

    #[test]
    fn totals_never_decrease_across_ticks() {
        let roles = default_roles();
        let mut mix = RoleCounts::zeroed(&roles);
        let mut snapshot = MeetingCostSnapshot::empty();

        for tick in 0..50_i64 {
            mix.set("individual_contributor", tick % 7);
            let next = snapshot.advance(1.0, &mix, &roles).unwrap();
            assert!(next.total_seconds >= snapshot.total_seconds);
            assert!(next.total_cost >= snapshot.total_cost);
            snapshot = next;
        }
        assert_eq!(snapshot.total_seconds, 50.0);
    }

    #[test]
    fn rejects_negative_and_non_finite_elapsed() {
        let roles = custom_roles();
        let mix = RoleCounts::new();

        let err = advance(MeetingCostSnapshot::empty(), -1.0, &mix, &roles).unwrap_err();
        assert_eq!(err, CostError::NegativeElapsed { seconds: -1.0 });

        let err = advance(MeetingCostSnapshot::empty(), f64::INFINITY, &mix, &roles).unwrap_err();
        assert!(matches!(err, CostError::NonFiniteElapsed { .. }));

        let err = advance(MeetingCostSnapshot::empty(), f64::NAN, &mix, &roles).unwrap_err();
        assert!(matches!(err, CostError::NonFiniteElapsed { .. }));
    }
}
