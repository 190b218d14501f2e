//! Shadow-map configuration shared by every light in a rig

use super::projection::{OrthoProjection, PerspectiveProjection};

/// Width and height of each shadow map face when nothing else is configured
pub const DEFAULT_SHADOW_RESOLUTION: u32 = 1024;

/// Length of the lit shader's `lightSpaceMatrix` array
pub const MAX_SHADOW_MAPS: usize = 8;

/// Resolution and projection parameters used when lights allocate shadow maps
///
/// Built with the same default-then-override style as the pipeline configs:
///
/// ```
/// use shadowcaster::gfx::lighting::{PerspectiveProjection, ShadowSettings};
///
/// let settings = ShadowSettings::default()
///     .with_resolution(2048, 2048)
///     .with_spot(PerspectiveProjection::spot().with_planes(1.0, 100.0));
/// assert_eq!(settings.width, 2048);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShadowSettings {
    pub width: u32,
    pub height: u32,
    pub directional: OrthoProjection,
    pub point: PerspectiveProjection,
    pub spot: PerspectiveProjection,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_SHADOW_RESOLUTION,
            height: DEFAULT_SHADOW_RESOLUTION,
            directional: OrthoProjection::default(),
            point: PerspectiveProjection::point(),
            spot: PerspectiveProjection::spot(),
        }
    }
}

impl ShadowSettings {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_directional(mut self, projection: OrthoProjection) -> Self {
        self.directional = projection;
        self
    }

    pub fn with_point(mut self, projection: PerspectiveProjection) -> Self {
        self.point = projection;
        self
    }

    pub fn with_spot(mut self, projection: PerspectiveProjection) -> Self {
        self.spot = projection;
        self
    }

    /// Width over height of a shadow map face
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
