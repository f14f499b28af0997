//! Loop time sources

use std::time::{Duration, Instant};

/// Time source the scheduler samples and sleeps on.
///
/// The production implementation is [`MonotonicClock`]; tests script
/// elapsed time instead of waiting for it.
pub trait Clock {
    /// Current instant on a monotonic timeline.
    fn now(&mut self) -> Instant;

    /// Block the loop thread for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Delta-time sampler over a [`Clock`].
///
/// Keeps the previous sample and hands out the elapsed time since it.
/// Deltas are never negative; a platform clock stepping backwards reads
/// as zero elapsed time.
pub struct FrameClock<C: Clock> {
    clock: C,
    last: Instant,
}

impl<C: Clock> FrameClock<C> {
    pub fn new(mut clock: C) -> Self {
        let last = clock.now();
        Self { clock, last }
    }

    /// Forget accumulated time; the next [`delta`](Self::delta) measures
    /// from here. Called on loop entry so setup time is not replayed as
    /// simulation catch-up.
    pub fn reset(&mut self) {
        self.last = self.clock.now();
    }

    /// Elapsed time since the previous sample (or [`reset`](Self::reset)).
    pub fn delta(&mut self) -> Duration {
        let now = self.clock.now();
        let delta = now.saturating_duration_since(self.last);
        self.last = now;
        delta
    }

    pub fn sleep(&mut self, duration: Duration) {
        self.clock.sleep(duration);
    }
}
