//! One-second driver abstraction.
//!
//! The engine never schedules anything itself. Whoever owns the engine
//! arms the heartbeat when the timer enters `Running` and cancels it when
//! it leaves; the real driver then calls `tick()` once per second.

/// A cancellable once-per-second trigger.
pub trait Heartbeat {
    /// Start (or restart) firing.
    fn arm(&mut self);
    /// Stop firing. Must take effect before the next tick is delivered.
    fn cancel(&mut self);
    fn is_armed(&self) -> bool;
}

/// Deterministic heartbeat for tests and headless use.
///
/// Nothing fires on its own; callers inject ticks explicitly and can
/// inspect how often the heartbeat was armed and cancelled.
#[derive(Debug, Default, Clone)]
pub struct ManualHeartbeat {
    armed: bool,
    arms: usize,
    cancels: usize,
}

impl ManualHeartbeat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_count(&self) -> usize {
        self.arms
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels
    }
}

impl Heartbeat for ManualHeartbeat {
    fn arm(&mut self) {
        self.armed = true;
        self.arms += 1;
    }

    fn cancel(&mut self) {
        self.armed = false;
        self.cancels += 1;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}
