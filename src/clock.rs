use std::time::{Duration, Instant};

/// Time source for the frame loop. Timestamps are offsets from an arbitrary
/// origin fixed when the clock is created.
pub trait Clock {
    fn now(&self) -> Duration;
    /// Blocks (or pretends to) until `d` has passed.
    fn sleep(&mut self, d: Duration);
}

/// Wall clock.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Clock that only moves when told to; sleeping advances it instantly.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock::default()
    }

    pub fn at(now: Duration) -> ManualClock {
        ManualClock { now }
    }

    pub fn advance(&mut self, d: Duration) {
        self.now += d;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, d: Duration) {
        self.advance(d);
    }
}
