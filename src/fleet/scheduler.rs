//! Periodic work driven by an external clock.

use std::time::{Duration, Instant};

/// Shortest period a task accepts.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A repeating deadline with an enabled flag.
///
/// The task never sleeps itself: the owner calls [`PeriodicTask::poll`] with
/// the current time and runs the work when it returns `true`. Periods missed
/// while nobody polled are skipped, not replayed.
#[derive(Debug, Clone)]
pub struct PeriodicTask {
    period: Duration,
    next_due: Option<Instant>,
}

impl PeriodicTask {
    /// A disabled task with the given period.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            next_due: None,
        }
    }

    /// Enable the task; the first run is due one period after `now`.
    ///
    /// A period that would overflow the clock leaves the task disabled.
    pub fn start(&mut self, period: Duration, now: Instant) {
        self.period = period.max(MIN_PERIOD);
        self.next_due = now.checked_add(self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the next run is due, if enabled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_due
    }

    /// Returns `true` when a run is due at `now` and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        self.next_due = match due.checked_add(self.period) {
            Some(next) if next > now => Some(next),
            _ => now.checked_add(self.period),
        };
        true
    }
}
