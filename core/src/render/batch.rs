//! Quad accumulation and flushing

use anyhow::{Result, bail};
use glam::Mat4;

use super::{Graphics, MAX_BATCH_VERTICES, TextureHandle, VERTICES_PER_QUAD, Vertex};

/// CPU-side vertex accumulator with deferred GPU submission.
///
/// All buffered vertices reference the single active texture; switching
/// textures or running out of capacity flushes the buffer as one draw
/// call. Created once at startup and reused across frames (a flush resets
/// the length, not the allocation).
pub struct QuadBatch {
    vertices: Vec<Vertex>,
    active_texture: Option<TextureHandle>,
    projection: Mat4,
    screen_size: (u32, u32),
}

impl QuadBatch {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            vertices: Vec::with_capacity(MAX_BATCH_VERTICES),
            active_texture: None,
            projection: ortho_projection(width, height),
            screen_size: (width, height),
        }
    }

    /// Number of buffered, not-yet-submitted vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn active_texture(&self) -> Option<TextureHandle> {
        self.active_texture
    }

    pub fn screen_size(&self) -> (u32, u32) {
        self.screen_size
    }

    /// Current pixel-space to clip-space projection.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Adopt a new drawable size: recompute the projection and reconfigure
    /// the backend's frame target.
    ///
    /// Runs on every resize event (and once at startup), before the next
    /// flush, so buffered geometry never renders with stale scaling. The
    /// scheduler dispatches resizes between frames, when the batch is
    /// empty.
    pub fn set_screen<G: Graphics>(&mut self, gfx: &mut G, width: u32, height: u32) {
        self.projection = ortho_projection(width, height);
        self.screen_size = (width, height);
        gfx.resize(width, height);
    }

    /// Select the texture subsequent quads are drawn with.
    ///
    /// A single GPU draw call references exactly one texture, so changing
    /// the selection flushes everything accumulated so far. Re-selecting
    /// the active texture is free.
    pub fn set_texture<G: Graphics>(&mut self, gfx: &mut G, texture: TextureHandle) -> Result<()> {
        if self.active_texture == Some(texture) {
            return Ok(());
        }
        self.flush(gfx)?;
        self.active_texture = Some(texture);
        Ok(())
    }

    /// Buffer one textured quad.
    ///
    /// `(x, y, w, h)` is the quad in screen pixels, `(tx, ty, tw, th)` the
    /// source region in normalized texture coordinates. Two triangles
    /// sharing the top-right/bottom-left diagonal are appended; the GPU is
    /// only touched when capacity forces a flush first.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_quad<G: Graphics>(
        &mut self,
        gfx: &mut G,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        tx: f32,
        ty: f32,
        tw: f32,
        th: f32,
    ) -> Result<()> {
        if self.active_texture.is_none() {
            bail!("no texture selected: call set_texture() before draw_quad()");
        }
        if self.vertices.len() + VERTICES_PER_QUAD > MAX_BATCH_VERTICES {
            self.flush(gfx)?;
        }

        let (x1, y1) = (x + w, y + h);
        let (u1, v1) = (tx + tw, ty + th);
        self.vertices.extend_from_slice(&[
            Vertex::new(x, y, tx, ty),
            Vertex::new(x, y1, tx, v1),
            Vertex::new(x1, y, u1, ty),
            Vertex::new(x, y1, tx, v1),
            Vertex::new(x1, y1, u1, v1),
            Vertex::new(x1, y, u1, ty),
        ]);
        Ok(())
    }

    /// Submit everything buffered as one draw call and reset the buffer.
    ///
    /// No-op when empty. This is the only place the batch reaches the GPU;
    /// it runs at texture changes, at capacity, and unconditionally at the
    /// end of every rendered frame.
    pub fn flush<G: Graphics>(&mut self, gfx: &mut G) -> Result<()> {
        if self.vertices.is_empty() {
            return Ok(());
        }
        let texture = self
            .active_texture
            .expect("non-empty batch always has an active texture");
        gfx.draw(&self.vertices, texture, &self.projection)?;
        self.vertices.clear();
        Ok(())
    }
}

/// Map the `(0,0)..(w,h)` pixel rectangle (top-left origin, y down) onto
/// clip space.
fn ortho_projection(width: u32, height: u32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width.max(1) as f32, height.max(1) as f32, 0.0, -1.0, 1.0)
}

/// Per-frame drawing context handed to [`Game`](crate::Game) callbacks.
///
/// Bundles the persistent [`QuadBatch`] with the graphics backend so the
/// application cannot bypass the batching rules. The scheduler flushes any
/// remainder after the render callback returns, so nothing is ever left
/// unpresented.
pub struct Canvas<'a, G: Graphics> {
    batch: &'a mut QuadBatch,
    gfx: &'a mut G,
}

impl<'a, G: Graphics> Canvas<'a, G> {
    pub(crate) fn new(batch: &'a mut QuadBatch, gfx: &'a mut G) -> Self {
        Self { batch, gfx }
    }

    /// Fill the frame with a solid color, discarding earlier draws.
    ///
    /// Pending quads are flushed first so submission order matches call
    /// order.
    pub fn clear(&mut self, r: f32, g: f32, b: f32) -> Result<()> {
        self.batch.flush(self.gfx)?;
        self.gfx.clear([r, g, b, 1.0])
    }

    /// See [`QuadBatch::set_texture`].
    pub fn set_texture(&mut self, texture: TextureHandle) -> Result<()> {
        self.batch.set_texture(self.gfx, texture)
    }

    /// See [`QuadBatch::draw_quad`].
    #[allow(clippy::too_many_arguments)]
    pub fn draw_quad(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        tx: f32,
        ty: f32,
        tw: f32,
        th: f32,
    ) -> Result<()> {
        self.batch.draw_quad(self.gfx, x, y, w, h, tx, ty, tw, th)
    }

    /// Upload RGBA8 pixels; see [`Graphics::load_texture`] for the format
    /// contract.
    pub fn load_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureHandle> {
        self.gfx.load_texture(width, height, pixels)
    }

    /// Current drawable size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.batch.screen_size()
    }

    /// End-of-frame flush, called by the scheduler after the render
    /// callback returns.
    pub(crate) fn finish(&mut self) -> Result<()> {
        self.batch.flush(self.gfx)
    }
}
