//! wgpu graphics backend
//!
//! Implements the core [`Graphics`] trait over a window surface: frame
//! acquire/present, clear handling, texture upload, and the single-pass
//! draw submission the quad batch flushes into.

mod init;
mod texture;

pub use texture::TextureStore;

use anyhow::{Context, Result, bail};
use glam::Mat4;

use glint_core::render::{Graphics, MAX_BATCH_VERTICES, TextureHandle, Vertex};

/// Graphics backend over a wgpu device and window surface.
///
/// One render pipeline, one reusable vertex buffer, one projection
/// uniform. Each [`draw`](Graphics::draw) is a self-contained render pass;
/// a pending clear folds into the next pass's load op so a typical frame
/// (clear + one batch) costs a single submission.
pub struct WgpuGraphics {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    pipeline: wgpu::RenderPipeline,
    frame_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    vertex_buffer: wgpu::Buffer,
    projection_buffer: wgpu::Buffer,

    textures: TextureStore,

    // Frame state
    current_frame: Option<wgpu::SurfaceTexture>,
    current_view: Option<wgpu::TextureView>,
    pending_clear: Option<wgpu::Color>,
}

impl WgpuGraphics {
    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Load op for the next render pass: a pending clear is consumed by
    /// the first pass that runs after it.
    fn take_load_op(&mut self) -> wgpu::LoadOp<wgpu::Color> {
        match self.pending_clear.take() {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        }
    }

    /// Submit a draw-less pass so a trailing clear still reaches the
    /// screen.
    fn submit_clear_pass(&mut self) -> Result<()> {
        let load = self.take_load_op();
        let view = self
            .current_view
            .as_ref()
            .context("clear outside an active frame")?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}

impl Graphics for WgpuGraphics {
    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        tracing::debug!("Surface resized to {}x{}", self.config.width, self.config.height);
    }

    fn begin_frame(&mut self) -> Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Happens around resizes and display-mode switches; a
                // reconfigure brings the swapchain back.
                tracing::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.surface
                    .get_current_texture()
                    .context("Failed to reacquire surface texture after reconfigure")?
            }
            Err(e) => return Err(e).context("Failed to acquire surface texture"),
        };

        self.current_view = Some(
            frame
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
        );
        self.current_frame = Some(frame);
        self.pending_clear = None;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        // A clear with no draws after it still has to reach the screen.
        if self.pending_clear.is_some() {
            self.submit_clear_pass()?;
        }
        self.current_view = None;
        let frame = self
            .current_frame
            .take()
            .context("end_frame without begin_frame")?;
        frame.present();
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4]) -> Result<()> {
        if self.current_frame.is_none() {
            bail!("clear outside an active frame");
        }
        self.pending_clear = Some(wgpu::Color {
            r: color[0] as f64,
            g: color[1] as f64,
            b: color[2] as f64,
            a: color[3] as f64,
        });
        Ok(())
    }

    fn load_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureHandle> {
        self.textures.load(
            &self.device,
            &self.queue,
            &self.texture_bind_group_layout,
            &self.sampler,
            width,
            height,
            pixels,
        )
    }

    fn draw(
        &mut self,
        vertices: &[Vertex],
        texture: TextureHandle,
        projection: &Mat4,
    ) -> Result<()> {
        if vertices.len() > MAX_BATCH_VERTICES {
            bail!(
                "draw of {} vertices exceeds buffer capacity {}",
                vertices.len(),
                MAX_BATCH_VERTICES
            );
        }
        let load = self.take_load_op();
        let view = self
            .current_view
            .as_ref()
            .context("draw outside an active frame")?;
        let texture_bind_group = self
            .textures
            .bind_group(texture)
            .with_context(|| format!("unknown texture handle {}", texture.0))?;

        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        self.queue.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
        self.queue
            .write_buffer(&self.projection_buffer, 0, bytemuck::bytes_of(projection));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Quad Batch Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Quad Batch Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            render_pass.set_bind_group(1, texture_bind_group, &[]);
            // Only the in-use prefix of the buffer is bound.
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..vertex_bytes.len() as u64));
            render_pass.draw(0..vertices.len() as u32, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}
