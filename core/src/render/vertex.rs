//! Quad vertex layout

use bytemuck::{Pod, Zeroable};

/// One vertex of a batched quad.
///
/// `position` is in screen pixels (top-left origin, pre-projection),
/// `uv` in normalized texture coordinates. 16 bytes, tightly packed; the
/// wgpu vertex buffer layout in the backend mirrors these offsets.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }
}
