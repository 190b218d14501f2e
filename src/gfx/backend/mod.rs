//! Graphics context implementations

pub mod wgpu_context;

pub use wgpu_context::WgpuContext;
