//! Glint - Minimal 2D presentation loop
//!
//! Fixed-timestep scheduling with display-rate rendering, and batched
//! textured-quad drawing with deferred GPU submission. The
//! platform-independent loop and batching rules live in `glint-core`; this
//! crate supplies the real backends (wgpu graphics, winit windowing) and
//! the [`run`] entry point.
//!
//! ```no_run
//! use glint::{Canvas, Config, Game, WgpuGraphics};
//!
//! struct Hello;
//!
//! impl Game<WgpuGraphics> for Hello {
//!     fn update(&mut self) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//!
//!     fn render(&mut self, canvas: &mut Canvas<'_, WgpuGraphics>) -> anyhow::Result<()> {
//!         canvas.clear(0.1, 0.1, 0.1)
//!     }
//! }
//!
//! fn main() -> Result<(), glint::AppError> {
//!     glint::run(Config::default(), &mut Hello)
//! }
//! ```

pub mod app;
pub mod graphics;
pub mod window;

pub use app::{AppError, run};
pub use graphics::WgpuGraphics;
pub use window::WinitSurface;

// Re-export the core surface so applications depend on one crate.
pub use glint_core::{
    Canvas, Config, Game, Graphics, PacingPolicy, QuadBatch, Runtime, Surface, SurfaceEvent,
    TextureHandle, Vertex,
};
