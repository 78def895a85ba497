//! Serial tick driver
//!
//! The scheduler never runs anything itself. The engine asks it how many
//! ticks are due for the time that passed, runs them one after another, and
//! the next tick becomes due one interval after the previous one completed.
//! Ticks can never overlap, and there is only ever one chain.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    Stopped,
    Running {
        /// Time accumulated toward the next tick
        pending: Duration,
    },
}

/// Fixed-interval, self-rescheduling tick clock
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval: Duration,
    max_catch_up: u32,
    state: SchedulerState,
}

impl TickScheduler {
    pub fn new(interval: Duration, max_catch_up: u32) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            max_catch_up: max_catch_up.max(1),
            state: SchedulerState::Stopped,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    /// Arm the first tick one interval from now. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = SchedulerState::Running {
            pending: Duration::ZERO,
        };
        true
    }

    /// Cancel any pending tick. Safe to call when stopped.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = SchedulerState::Stopped;
        was_running
    }

    /// Account for `elapsed` wall time and return how many ticks are now due.
    ///
    /// At most `max_catch_up` ticks are released per call, and the caller runs
    /// them back to back with no wait in between. Any backlog beyond that is
    /// dropped rather than replayed.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let SchedulerState::Running { pending } = &mut self.state else {
            return 0;
        };

        *pending = pending.saturating_add(elapsed);
        let mut due = 0;
        while *pending >= self.interval && due < self.max_catch_up {
            *pending -= self.interval;
            due += 1;
        }
        if *pending >= self.interval {
            log::debug!(
                "Dropping {:?} of tick backlog after {} catch-up ticks",
                *pending,
                due
            );
            *pending = Duration::ZERO;
        }
        due
    }
}
