//! Tick delivery.
//!
//! The session never schedules its own ticks. A [`TickSource`] reports
//! elapsed seconds, and [`drive`] applies each report to a shared session
//! inside a single lock so concurrent commands and ticks serialize.

use std::collections::VecDeque;
use std::future;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::CostError;
use crate::history::CostHistoryPoint;
use crate::session::{SECONDS_PER_TICK, SessionController};

/// A session shared between a tick driver and a command handler.
pub type SharedSession = Arc<Mutex<SessionController>>;

/// Something that reports elapsed time at roughly one-second intervals.
pub trait TickSource {
    /// Waits for the next tick and returns the seconds it covers.
    ///
    /// `None` means the source is exhausted.
    fn next_tick(&mut self) -> impl Future<Output = Option<f64>> + Send;
}

/// A fixed sequence of ticks, delivered immediately.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTicks {
    ticks: VecDeque<f64>,
}

impl ScriptedTicks {
    pub fn new(ticks: impl IntoIterator<Item = f64>) -> Self {
        Self {
            ticks: ticks.into_iter().collect(),
        }
    }

    /// `count` standard one-second ticks.
    pub fn uniform(count: usize) -> Self {
        Self::new(std::iter::repeat_n(SECONDS_PER_TICK, count))
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl TickSource for ScriptedTicks {
    fn next_tick(&mut self) -> impl Future<Output = Option<f64>> + Send {
        future::ready(self.ticks.pop_front())
    }
}

/// Outcome of a [`drive`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveStats {
    /// Ticks that advanced the session.
    pub applied: u64,
    /// Ticks dropped because the session was paused.
    pub skipped: u64,
}

/// Locks a shared session, recovering the state if a holder panicked.
pub fn lock(session: &SharedSession) -> MutexGuard<'_, SessionController> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Feeds ticks from `source` into `session` until the source is exhausted or
/// `on_tick` breaks.
///
/// Each tick is checked against the run state and applied under one lock, so
/// once `pause` returns no later tick can advance the session. `on_tick` runs
/// after the lock is released.
pub async fn drive<S, F>(
    session: &SharedSession,
    source: &mut S,
    mut on_tick: F,
) -> Result<DriveStats, CostError>
where
    S: TickSource,
    F: FnMut(&CostHistoryPoint) -> ControlFlow<()>,
{
    let mut stats = DriveStats::default();

    while let Some(seconds) = source.next_tick().await {
        let applied = {
            let mut guard = lock(session);
            guard.apply_tick(seconds)?
        };

        let Some(point) = applied else {
            stats.skipped += 1;
            continue;
        };
        stats.applied += 1;

        if on_tick(&point).is_break() {
            break;
        }
    }

    tracing::debug!(applied = stats.applied, skipped = stats.skipped, "tick source stopped");
    Ok(stats)
}
