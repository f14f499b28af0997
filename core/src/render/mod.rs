//! Batched 2D quad rendering
//!
//! Draw requests accumulate CPU-side in a [`QuadBatch`] and reach the GPU
//! only when a flush is forced: the active texture changes, the vertex
//! buffer fills up, or the frame ends. The GPU itself sits behind the
//! [`Graphics`] trait so the batching rules can be tested against a
//! recording fake.

mod batch;
mod vertex;


pub use batch::{Canvas, QuadBatch};
pub use vertex::Vertex;

use anyhow::Result;
use glam::Mat4;

/// Batch capacity in quads.
pub const MAX_QUADS: usize = 512;

/// Vertices per quad (two triangles, no index buffer).
pub const VERTICES_PER_QUAD: usize = 6;

/// Batch capacity in vertices; reaching it forces a flush.
pub const MAX_BATCH_VERTICES: usize = MAX_QUADS * VERTICES_PER_QUAD;

/// Maximum simultaneously resident textures.
///
/// The policy constant lives here; each [`Graphics`] implementation's
/// texture store enforces it.
pub const MAX_TEXTURE_SLOTS: usize = 16;

/// Opaque handle to a GPU-resident texture.
///
/// Unique per load and stable for the process lifetime; textures are
/// immutable once uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// GPU boundary consumed by the batcher and the scheduler.
///
/// One implementation renders through wgpu (the `glint` crate); tests use
/// a recording fake. Methods are only ever called from the loop thread.
pub trait Graphics {
    /// Reconfigure the frame target after a surface size change.
    ///
    /// Called before the next frame begins, never mid-frame.
    fn resize(&mut self, width: u32, height: u32);

    /// Acquire the frame target. Precedes any clear or draw in a frame.
    fn begin_frame(&mut self) -> Result<()>;

    /// Present the finished frame. Exactly one call per rendered frame.
    fn end_frame(&mut self) -> Result<()>;

    /// Fill the frame target with a solid color, discarding prior draws.
    fn clear(&mut self, color: [f32; 4]) -> Result<()>;

    /// Upload RGBA8 pixel data and return a stable handle.
    ///
    /// `pixels` is row-major, top-to-bottom, 4 bytes per pixel, exactly
    /// `width * height * 4` bytes. Fails recoverably when the texture-slot
    /// capacity ([`MAX_TEXTURE_SLOTS`]) is exhausted.
    fn load_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureHandle>;

    /// Submit one draw call: all of `vertices` under a single `texture`
    /// with the given projection. This is the only GPU submission path.
    fn draw(&mut self, vertices: &[Vertex], texture: TextureHandle, projection: &Mat4)
    -> Result<()>;
}
