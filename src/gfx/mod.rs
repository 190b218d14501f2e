//! # Graphics Module
//!
//! Everything between the render loop and the graphics driver that concerns
//! lights and their shadow maps.
//!
//! ## Architecture Overview
//!
//! - **Lighting** ([`lighting`]) - light kinds, shadow-map lifecycle, light-space math
//! - **Context** ([`context`]) - render-target allocation and global binding state
//! - **Uniforms** ([`uniforms`]) - named shader uniform marshaling
//! - **Backend** ([`backend`]) - wgpu implementation of the graphics context
//! - **Resources** ([`resources`]) - GPU depth textures, views and samplers
//!
//! ## Frame Order
//!
//! Every frame renders all shadow maps first, then uploads lights and binds
//! the maps for the lit pass:
//!
//! ```no_run
//! use shadowcaster::gfx::{context::GraphicsContext, lighting::LightRig, uniforms::UniformTable};
//!
//! fn frame(
//!     ctx: &mut dyn GraphicsContext,
//!     rig: &LightRig,
//!     draw_flat: &mut dyn FnMut(),
//!     draw_cube: &mut dyn FnMut(),
//! ) {
//!     let mut depth = UniformTable::new();
//!     let mut cube_depth = UniformTable::new();
//!     let mut lit = UniformTable::new();
//!
//!     rig.render_shadow_maps(ctx, &mut depth, &mut cube_depth, draw_flat, draw_cube);
//!     rig.upload(ctx, &mut lit);
//!     // ... lit pass samples the shadow maps here
//! }
//! ```

pub mod backend;
pub mod context;
pub mod lighting;
pub mod resources;
pub mod uniforms;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use backend::WgpuContext;
pub use context::GraphicsContext;
pub use lighting::{Light, LightRig};
pub use uniforms::{UniformSink, UniformTable};
