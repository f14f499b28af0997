//! Glint Core - Platform-independent presentation loop
//!
//! This crate provides the fixed-timestep frame scheduler and the batched
//! quad renderer that make up the heart of Glint, together with the trait
//! seams the platform backends plug into.
//!
//! # Architecture
//!
//! - [`Runtime`] - Loop driver: fixed-step updates, bounded catch-up,
//!   display-rate rendering, frame-budget sleeping
//! - [`Game`] - Trait implemented by the hosted application (update,
//!   render, resize/close hooks)
//! - [`QuadBatch`] / [`Canvas`] - Vertex accumulation with deferred GPU
//!   submission; one draw call per texture run
//! - [`Surface`] - Platform boundary: event pumping, visibility, size,
//!   refresh rate
//! - [`Graphics`] - GPU boundary: frame acquire/present, texture upload,
//!   draw submission
//!
//! Everything here is free of windowing and GPU dependencies; the real
//! backends live in the `glint` crate, and the whole loop can be exercised
//! in tests with fakes.

pub mod config;
pub mod render;
pub mod runtime;
pub mod surface;

#[cfg(test)]
pub mod test_utils;

// Re-export core traits and types
pub use config::Config;
pub use render::{
    Canvas, Graphics, MAX_BATCH_VERTICES, MAX_QUADS, MAX_TEXTURE_SLOTS, QuadBatch, TextureHandle,
    Vertex,
};
pub use runtime::{Clock, FrameClock, Game, MonotonicClock, PacingPolicy, Runtime};
pub use surface::{Surface, SurfaceEvent};
