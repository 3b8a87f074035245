//! Bounded window of recent cost samples.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cost::MeetingCostSnapshot;

/// Maximum number of samples kept for trend display.
pub const HISTORY_LIMIT: usize = 300;

/// One tick's worth of cost state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostHistoryPoint {
    pub elapsed_seconds: f64,
    pub total_cost: f64,
    pub cost_per_second: f64,
}

impl From<MeetingCostSnapshot> for CostHistoryPoint {
    fn from(snapshot: MeetingCostSnapshot) -> Self {
        Self {
            elapsed_seconds: snapshot.total_seconds,
            total_cost: snapshot.total_cost,
            cost_per_second: snapshot.cost_per_second,
        }
    }
}

/// Chronological sliding window of [`CostHistoryPoint`]s.
///
/// Once full, every push evicts the oldest sample. This is a trend buffer,
/// not an audit log.
#[derive(Debug, Clone, PartialEq)]
pub struct CostHistory {
    points: VecDeque<CostHistoryPoint>,
    limit: usize,
}

impl Default for CostHistory {
    fn default() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }
}

impl CostHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer holding at most `limit` samples (at least one).
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            points: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Appends a sample, dropping from the front past the limit.
    pub fn push(&mut self, point: CostHistoryPoint) {
        self.points.push_back(point);
        while self.points.len() > self.limit {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }

    pub fn first(&self) -> Option<&CostHistoryPoint> {
        self.points.front()
    }

    pub fn last(&self) -> Option<&CostHistoryPoint> {
        self.points.back()
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &CostHistoryPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<CostHistoryPoint> {
        self.points.iter().copied().collect()
    }

    /// The newest `count` samples as a new buffer with the same limit.
    #[must_use]
    pub fn recent(&self, count: usize) -> Self {
        let skip = self.points.len().saturating_sub(count);
        let mut recent = Self::with_limit(self.limit);
        recent.points.extend(self.points.iter().skip(skip).copied());
        recent
    }

    /// Projects total cost onto a `width` × `height` viewport.
    ///
    /// Returns `None` with fewer than two samples. Points are spread evenly
    /// along x; y is inverted so higher cost sits nearer zero. When every
    /// sample has the same cost the range is taken as 1, giving a flat line
    /// along the bottom edge.
    #[allow(clippy::cast_precision_loss)]
    pub fn trend(&self, width: f64, height: f64) -> Option<Vec<(f64, f64)>> {
        if self.points.len() < 2 {
            return None;
        }

        let (min, max) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), point| {
                (min.min(point.total_cost), max.max(point.total_cost))
            });
        let range = if max - min == 0.0 { 1.0 } else { max - min };
        let last_index = (self.points.len() - 1) as f64;

        Some(
            self.points
                .iter()
                .enumerate()
                .map(|(index, point)| {
                    let x = index as f64 / last_index * width;
                    let normalized = (point.total_cost - min) / range;
                    (x, height - normalized * height)
                })
                .collect(),
        )
    }
}

impl FromIterator<CostHistoryPoint> for CostHistory {
    fn from_iter<I: IntoIterator<Item = CostHistoryPoint>>(iter: I) -> Self {
        let mut history = Self::new();
        for point in iter {
            history.push(point);
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn point(second: usize) -> CostHistoryPoint {
        CostHistoryPoint {
            elapsed_seconds: second as f64,
            total_cost: second as f64 * 0.5,
            cost_per_second: 0.5,
        }
    }

    #[test]
    fn push_keeps_chronological_order() {
        let mut history = CostHistory::new();
        history.push(point(1));
        history.push(point(2));
        history.push(point(3));

        let seconds: Vec<_> = history.iter().map(|p| p.elapsed_seconds).collect();
        assert_eq!(seconds, [1.0, 2.0, 3.0]);
        assert_eq!(history.last(), Some(&point(3)));
    }

    #[test]
    fn window_is_capped_at_limit() {
        let mut history = CostHistory::new();
        for second in 1..=450 {
            history.push(point(second));
        }

        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.first(), Some(&point(151)));
        assert_eq!(history.last(), Some(&point(450)));
    }

    #[test]
    fn custom_limit_evicts_oldest() {
        let mut history = CostHistory::with_limit(2);
        history.push(point(1));
        history.push(point(2));
        history.push(point(3));

        assert_eq!(history.to_vec(), vec![point(2), point(3)]);
        assert_eq!(CostHistory::with_limit(0).limit(), 1);
    }

    #[test]
    fn clear_empties_the_window() {
        let mut history: CostHistory = (1..=5).map(point).collect();
        history.clear();
        assert!(history.is_empty());
        assert!(history.last().is_none());
    }

    #[test]
    fn recent_takes_newest_samples() {
        let history: CostHistory = (1..=10).map(point).collect();
        let recent = history.recent(3);
        let seconds: Vec<_> = recent.iter().map(|p| p.elapsed_seconds).collect();
        assert_eq!(seconds, [8.0, 9.0, 10.0]);
        assert_eq!(history.recent(50).len(), 10);
    }

    #[test]
    fn snapshot_converts_to_point() {
        let snapshot = MeetingCostSnapshot {
            total_seconds: 12.0,
            total_cost: 3.0,
            cost_per_second: 0.25,
        };
        let point = CostHistoryPoint::from(snapshot);
        assert_eq!(point.elapsed_seconds, 12.0);
        assert_eq!(point.total_cost, 3.0);
        assert_eq!(point.cost_per_second, 0.25);
    }

    #[test]
    fn trend_needs_two_points() {
        assert!(CostHistory::new().trend(200.0, 60.0).is_none());
        let single: CostHistory = std::iter::once(point(1)).collect();
        assert!(single.trend(200.0, 60.0).is_none());
    }

    #[test]
    fn trend_normalizes_into_viewport() {
        let history: CostHistory = [0, 1, 2].into_iter().map(point).collect();
        let trend = history.trend(200.0, 60.0).unwrap();
        assert_eq!(trend, vec![(0.0, 60.0), (100.0, 30.0), (200.0, 0.0)]);
    }

    #[test]
    fn flat_trend_sits_on_bottom_edge() {
        let flat = CostHistoryPoint {
            elapsed_seconds: 1.0,
            total_cost: 5.0,
            cost_per_second: 0.0,
        };
        let history: CostHistory = [flat, flat, flat].into_iter().collect();
        let trend = history.trend(10.0, 4.0).unwrap();
        assert!(trend.iter().all(|&(_, y)| y == 4.0));
    }
}
