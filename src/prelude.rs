//! # Shadowcaster Prelude
//!
//! Commonly used types for building lights and driving shadow passes.
//!
//! ```rust
//! use shadowcaster::prelude::*;
//!
//! let sun = Light::base(LightColor::new(
//!     Vector3::new(0.05, 0.05, 0.05),
//!     Vector3::new(0.4, 0.4, 0.4),
//!     Vector3::new(0.5, 0.5, 0.5),
//! ));
//! let mut uniforms = UniformTable::new();
//! sun.write_uniforms(&mut uniforms, "light");
//! assert_eq!(uniforms.len(), 3);
//! ```

pub use crate::error::LightError;
pub use crate::gfx::backend::WgpuContext;
pub use crate::gfx::context::{
    DepthTarget, DepthTargetDesc, DepthTopology, FramebufferId, GraphicsContext, TextureId,
    Viewport,
};
pub use crate::gfx::lighting::{
    Attenuation, CubeFace, Light, LightColor, LightKind, LightRig, OrthoProjection,
    PerspectiveProjection, ShadowMatrices, ShadowParams, ShadowSettings, SpotCone,
};
pub use crate::gfx::uniforms::{UniformSink, UniformTable, UniformValue};
pub use crate::wgpu_utils::{ShadowMatricesBuffer, UniformBuffer};

pub use cgmath::{Matrix4, Vector3};
