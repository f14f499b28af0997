//! Texture storage
//!
//! Uploads RGBA8 pixel buffers to GPU-resident textures and hands out
//! opaque handles. Capacity is a fixed number of slots; exceeding it is a
//! recoverable error reported to the caller.

use anyhow::{Result, bail};
use hashbrown::HashMap;
use wgpu::util::DeviceExt;

use glint_core::render::{MAX_TEXTURE_SLOTS, TextureHandle};

/// GPU resources for one resident texture.
///
/// The bind group is created once at upload and reused by every draw that
/// selects this texture. Dimensions are tracked for debugging.
#[allow(dead_code)]
pub(crate) struct TextureEntry {
    pub texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

/// Owns all game textures for the process lifetime.
///
/// Textures are immutable once uploaded; there is no eviction, only the
/// slot-capacity ceiling.
pub struct TextureStore {
    textures: HashMap<u32, TextureEntry>,
    next_texture_id: u32,
}

impl TextureStore {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            next_texture_id: 1,
        }
    }

    /// Upload RGBA8 pixel data (row-major, top-to-bottom, 4 bytes/pixel)
    /// and return a stable handle.
    ///
    /// Fails recoverably on a size mismatch or when all
    /// [`MAX_TEXTURE_SLOTS`] slots are occupied.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bind_group_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureHandle> {
        let expected_size = (width * height * 4) as usize;
        if pixels.len() != expected_size {
            bail!(
                "pixel data size mismatch: expected {} bytes for {}x{}, got {}",
                expected_size,
                width,
                height,
                pixels.len()
            );
        }

        if self.textures.len() >= MAX_TEXTURE_SLOTS {
            bail!(
                "texture slots exhausted: {}/{}",
                self.textures.len(),
                MAX_TEXTURE_SLOTS
            );
        }

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Quad Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            pixels,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Quad Texture Bind Group"),
            layout: bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let handle = TextureHandle(self.next_texture_id);
        self.next_texture_id += 1;

        self.textures.insert(
            handle.0,
            TextureEntry {
                texture,
                bind_group,
                width,
                height,
            },
        );

        tracing::debug!(
            "Loaded texture {}: {}x{} ({}/{} slots)",
            handle.0,
            width,
            height,
            self.textures.len(),
            MAX_TEXTURE_SLOTS
        );

        Ok(handle)
    }

    /// Bind group for a previously loaded texture.
    pub(crate) fn bind_group(&self, handle: TextureHandle) -> Option<&wgpu::BindGroup> {
        self.textures.get(&handle.0).map(|entry| &entry.bind_group)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl Default for TextureStore {
    fn default() -> Self {
        Self::new()
    }
}
