//! Application configuration

use crate::runtime::PacingPolicy;

/// Startup configuration for a Glint application.
///
/// `width`/`height` are the initial client size in pixels; the surface may
/// be resized afterwards, which reaches the application through
/// [`Game::on_resize`](crate::Game::on_resize).
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial client width in pixels
    pub width: u32,
    /// Initial client height in pixels
    pub height: u32,
    /// Window title
    pub title: String,
    /// Frame pacing tunables (safety margin, refresh clamp, step cap)
    pub pacing: PacingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "glint".to_string(),
            pacing: PacingPolicy::default(),
        }
    }
}
