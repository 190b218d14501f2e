// src/lib.rs
//! Shadowcaster
//!
//! Lights and shadow mapping for real-time 3D rendering: directional, point
//! and spot lights that write their shader uniforms, own their depth-map
//! render targets, and compute the light-space transforms used to render and
//! sample shadows. Built on wgpu and cgmath.

pub mod error;
pub mod gfx;
pub mod prelude;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use error::{LightError, Result};
pub use gfx::lighting::{Light, LightRig};
