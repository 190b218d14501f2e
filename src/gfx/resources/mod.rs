// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles the depth textures, views and samplers behind shadow maps.

pub mod texture_resource;

// Re-export main types
pub use texture_resource::TextureResource;
