//! Frame pacing policy
//!
//! Derives the fixed update-step duration from the display refresh rate.
//! The margin and clamp constants avoid vsync-related stutter on displays
//! that report slightly optimistic rates; they are tunables, not contract.

use std::time::Duration;

/// Tunable frame-pacing constants.
#[derive(Debug, Clone)]
pub struct PacingPolicy {
    /// Subtracted from the refresh interval so the loop finishes a hair
    /// before the display wants the next frame.
    pub safety_margin: Duration,
    /// Reported refresh rates below this are distrusted and clamped.
    pub min_refresh_hz: u32,
    /// Reported refresh rates above this are distrusted and clamped.
    pub max_refresh_hz: u32,
    /// Maximum fixed update steps per loop iteration. Once the cap is hit,
    /// excess simulation time is dropped rather than letting a slow machine
    /// spiral into update starvation.
    pub max_steps_per_frame: u32,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            safety_margin: Duration::from_millis(2),
            min_refresh_hz: 30,
            max_refresh_hz: 120,
            max_steps_per_frame: 3,
        }
    }
}

impl PacingPolicy {
    /// Fixed update-step duration for a display running at `refresh_hz`.
    ///
    /// The rate is clamped into `[min_refresh_hz, max_refresh_hz]` (a
    /// surface that cannot tell reports 0, which lands on the floor), the
    /// interval is reduced by the safety margin, and the result is clamped
    /// back into the interval range so the margin can never push the budget
    /// outside it.
    pub fn frame_budget(&self, refresh_hz: u32) -> Duration {
        let hz = refresh_hz.clamp(self.min_refresh_hz, self.max_refresh_hz);
        let interval = Duration::from_secs_f64(1.0 / hz as f64);
        let floor = Duration::from_secs_f64(1.0 / self.max_refresh_hz as f64);
        let ceiling = Duration::from_secs_f64(1.0 / self.min_refresh_hz as f64);
        interval.saturating_sub(self.safety_margin).clamp(floor, ceiling)
    }
}
