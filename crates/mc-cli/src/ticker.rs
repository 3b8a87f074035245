//! Wall-clock tick source for live sessions.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

use mc_core::{SECONDS_PER_TICK, TickSource};

/// Emits one standard tick per `period` of wall-clock time.
///
/// The first tick fires one full period after creation. Late ticks are
/// delayed rather than bunched, so a stalled process never charges a burst
/// of catch-up seconds.
#[derive(Debug)]
pub struct IntervalTicks {
    interval: Interval,
}

impl IntervalTicks {
    /// Must be called inside a tokio runtime.
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl TickSource for IntervalTicks {
    fn next_tick(&mut self) -> impl Future<Output = Option<f64>> + Send {
        async move {
            self.interval.tick().await;
            Some(SECONDS_PER_TICK)
        }
    }
}
