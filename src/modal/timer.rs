//! One-shot deadline timers
//!
//! Timers are polled, not callback-driven: the owner calls `fire(now)` from
//! its tick and acts when it returns true. Cancelling is just clearing the
//! deadline, so a cancelled timer can never touch state it was scheduled
//! against.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)arm the timer; any previous deadline is replaced
    ///
    /// A deadline past what `Instant` can represent never fires.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = now.checked_add(delay);
        if self.deadline.is_none() {
            tracing::warn!("timer delay {:?} out of range; it will never fire", delay);
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[allow(dead_code)]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[cfg(test)]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once, on the first call at or after the deadline
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_deadline() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, Duration::from_millis(100));

        assert!(!timer.fire(t0 + Duration::from_millis(99)));
        assert!(timer.fire(t0 + Duration::from_millis(100)));
        assert!(!timer.fire(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, Duration::from_millis(10));
        timer.cancel();
        assert!(!timer.is_pending());
        assert!(!timer.fire(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn unrepresentable_delay_never_fires() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, Duration::MAX);
        assert!(!timer.is_pending());
        assert!(!timer.fire(t0 + Duration::from_secs(3600)));
    }

    #[test]
    fn zero_delay_fires_on_next_poll() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, Duration::ZERO);
        assert!(timer.fire(t0));
    }
}
