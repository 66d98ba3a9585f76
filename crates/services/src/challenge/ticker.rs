use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::debug;

/// Length of one timer unit.
pub const TICK_UNIT: Duration = Duration::from_secs(1);

/// The state that currently owns the running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOwner {
    Countdown { player: usize },
    Question { player: usize, question: usize },
}

/// A single repeating timer that follows the session state.
///
/// Changing the owner drops the old interval and starts a fresh one, so the
/// first tick for a new owner arrives one full unit after the change and no
/// tick scheduled for an earlier state is ever delivered.
#[derive(Debug)]
pub struct TickSchedule {
    unit: Duration,
    owner: Option<TimerOwner>,
    armed_at: Option<Instant>,
    interval: Option<Interval>,
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new(TICK_UNIT)
    }
}

impl TickSchedule {
    #[must_use]
    pub fn new(unit: Duration) -> Self {
        Self {
            unit,
            owner: None,
            armed_at: None,
            interval: None,
        }
    }

    #[must_use]
    pub fn owner(&self) -> Option<TimerOwner> {
        self.owner
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.owner.is_some()
    }

    /// Point the schedule at `owner`, re-arming only when the owner changed.
    pub fn sync(&mut self, owner: Option<TimerOwner>) {
        if self.owner == owner {
            return;
        }
        match owner {
            Some(next) => debug!(owner = ?next, "ticker armed"),
            None => debug!(previous = ?self.owner, "ticker cancelled"),
        }
        self.owner = owner;
        self.armed_at = owner.map(|_| Instant::now());
        self.interval = None;
    }

    /// Wait for the next tick. Never resolves while disarmed.
    ///
    /// Cancel safe: dropping the future does not lose or duplicate ticks.
    pub async fn next(&mut self) {
        let Some(armed_at) = self.armed_at else {
            return std::future::pending::<()>().await;
        };
        let unit = self.unit;
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = interval_at(armed_at + unit, unit);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn disarmed_schedule_never_fires() {
        let mut schedule = TickSchedule::default();
        let waited = tokio::time::timeout(Duration::from_secs(30), schedule.next()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_arrives_one_unit_after_arming() {
        let mut schedule = TickSchedule::default();
        schedule.sync(Some(TimerOwner::Countdown { player: 0 }));
        let start = Instant::now();
        schedule.next().await;
        assert_eq!(start.elapsed(), TICK_UNIT);
        schedule.next().await;
        assert_eq!(start.elapsed(), TICK_UNIT * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn new_owner_restarts_the_unit() {
        let mut schedule = TickSchedule::default();
        schedule.sync(Some(TimerOwner::Question {
            player: 0,
            question: 0,
        }));
        tokio::time::advance(Duration::from_millis(600)).await;

        schedule.sync(Some(TimerOwner::Question {
            player: 0,
            question: 1,
        }));
        let start = Instant::now();
        schedule.next().await;
        assert_eq!(start.elapsed(), TICK_UNIT);
    }

    #[tokio::test(start_paused = true)]
    async fn same_owner_keeps_cadence() {
        let mut schedule = TickSchedule::default();
        let owner = Some(TimerOwner::Countdown { player: 1 });
        schedule.sync(owner);
        let start = Instant::now();
        tokio::time::advance(Duration::from_millis(400)).await;
        schedule.sync(owner);
        schedule.next().await;
        assert_eq!(start.elapsed(), TICK_UNIT);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let mut schedule = TickSchedule::default();
        schedule.sync(Some(TimerOwner::Countdown { player: 0 }));
        schedule.sync(None);
        assert!(!schedule.is_armed());
        let waited = tokio::time::timeout(Duration::from_secs(5), schedule.next()).await;
        assert!(waited.is_err());
    }
}
