use std::time::{Duration, Instant};

/// Rings once every `duration`. Time is always passed in by the caller.
#[derive(Clone, Debug)]
pub struct Timer {
    duration: Duration,
    last: Option<Instant>,
}

impl Timer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            last: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether `duration` has passed since the last reset. A timer that
    /// was never reset is always ringing.
    pub fn ringing(&self, now: Instant) -> bool {
        match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.duration,
        }
    }

    pub fn reset(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Resets and returns true if the timer was ringing
    pub fn ring_and_reset(&mut self, now: Instant) -> bool {
        if !self.ringing(now) {
            return false;
        }
        self.reset(now);
        true
    }
}
