use std::time::{Duration, Instant};

/// Coalesces bursts of changes into one write.
///
/// The caller marks each change and polls `ready`; a write is due once
/// `delay` has passed since the most recent change. Time is passed in so
/// tests can drive it without sleeping.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_change: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_change: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a change at `now`, pushing the deadline back.
    pub fn mark(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    pub fn ready(&self, now: Instant) -> bool {
        self.last_change
            .is_some_and(|last| now.saturating_duration_since(last) >= self.delay)
    }

    /// Call after the write went out.
    pub fn clear(&mut self) {
        self.last_change = None;
    }
}
