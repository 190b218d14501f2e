//! Lights and shadow mapping
//!
//! Directional, point and spot lights that serialize themselves into shader
//! uniforms, own their depth render targets, and compute the light-space
//! transforms used to render and sample shadow maps.

pub mod attenuation;
pub mod color;
pub mod light;
pub mod projection;
pub mod rig;
pub mod settings;
pub mod shadow;

// Re-export main types
pub use attenuation::Attenuation;
pub use color::LightColor;
pub use light::{DirectionalLight, Light, LightKind, PointLight, SpotCone, SpotLight};
pub use projection::{CubeFace, OrthoProjection, PerspectiveProjection};
pub use rig::{LightRig, ShadowMatrices};
pub use settings::{ShadowSettings, DEFAULT_SHADOW_RESOLUTION, MAX_SHADOW_MAPS};
pub use shadow::{ShadowParams, ShadowState};
