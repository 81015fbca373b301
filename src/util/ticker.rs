//! Scoped timers for the single-threaded event loop.
//!
//! A [`Ticker`] is a periodic timer and a [`Deadline`] a one-shot one. Neither
//! owns an OS resource: the event loop asks them what is due on every pass.
//! Whoever holds the handle owns the timer, so dropping it (or replacing the
//! `Option` holding it with `None`) cancels it. There is nothing to forget to
//! clear when a screen or state goes away.

use std::time::{Duration, Instant};

/// Periodic timer. Fires once per `period`, measured from `start`.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    /// Start a ticker whose first fire is one period after `now`.
    pub fn start(period: Duration, now: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        Ticker {
            period,
            next: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Instant of the next fire.
    pub fn next_deadline(&self) -> Instant {
        self.next
    }

    /// Number of periods that elapsed since the last call, advancing the
    /// schedule past `now`. Returns 0 when nothing is due.
    pub fn due(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }
        let behind = now.duration_since(self.next);
        let extra = (behind.as_nanos() / self.period.as_nanos()) as u32;
        let fired = extra + 1;
        self.next += self.period * fired;
        fired
    }

    /// Change the period; the next fire is rescheduled from `now`.
    pub fn reschedule(&mut self, period: Duration, now: Instant) {
        *self = Ticker::start(period, now);
    }
}

/// One-shot timer.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(duration: Duration, now: Instant) -> Self {
        Deadline { at: now + duration }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.at
    }

    pub fn at(&self) -> Instant {
        self.at
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.at.saturating_duration_since(now)
    }
}

/// Earliest of a set of optional instants, for sizing the event poll timeout.
pub fn earliest(instants: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    instants.into_iter().flatten().min()
}
