//! Application entry point
//!
//! Wires the real backends into the core runtime: open a window surface,
//! bring up the wgpu graphics, and hand control to the scheduler until the
//! game exits.

use thiserror::Error;

use glint_core::config::Config;
use glint_core::runtime::{Game, Runtime};

use crate::graphics::WgpuGraphics;
use crate::window::WinitSurface;

/// Startup and loop failure classes surfaced to `main`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Window creation failed: {0}")]
    Window(String),
    #[error("Graphics initialization failed: {0}")]
    Graphics(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Run `game` in a window described by `config` until it exits.
///
/// Initialization failures abort before the loop starts; errors escaping a
/// game callback or the graphics backend stop the loop and surface as
/// [`AppError::Runtime`]. Window and GPU resources are released on drop.
pub fn run<A: Game<WgpuGraphics>>(config: Config, game: &mut A) -> Result<(), AppError> {
    let surface =
        WinitSurface::open(&config).map_err(|e| AppError::Window(format!("{e:#}")))?;

    let mut gfx = WgpuGraphics::new(surface.window().clone())
        .map_err(|e| AppError::Graphics(format!("{e:#}")))?;

    let mut runtime = Runtime::with_policy(surface, config.pacing.clone());
    tracing::info!(
        "Entering loop with frame budget {:.2} ms",
        runtime.frame_budget().as_secs_f64() * 1000.0
    );

    runtime
        .run(&mut gfx, game)
        .map_err(|e| AppError::Runtime(format!("{e:#}")))
}
