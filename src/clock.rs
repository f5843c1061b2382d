//! Frame timing sources.

use std::time::{Duration, Instant};

/// Supplies the elapsed time for each frame.
pub trait Clock: Send + Sync {
    /// Seconds since the previous call (or since creation, on the first call).
    fn tick(&mut self) -> f32;
}

/// Wall-clock time from a monotonic [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    last: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        elapsed.as_secs_f32()
    }
}

/// A constant step per frame, for deterministic replays and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    step: f32,
}

impl FixedClock {
    pub fn new(step: Duration) -> Self {
        Self { step: step.as_secs_f32() }
    }

    pub fn from_secs(step: f32) -> Self {
        Self { step }
    }
}

impl Clock for FixedClock {
    fn tick(&mut self) -> f32 {
        self.step
    }
}
