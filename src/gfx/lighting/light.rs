//! Light entities
//!
//! A [`Light`] is its color terms, one [`LightKind`] and, for every kind
//! except [`LightKind::Base`], a [`ShadowState`]. Point and spot lights carry
//! an [`Attenuation`] record. Uniform serialization always writes the shared
//! records first and the kind's own fields last, matching the member order of
//! the lit shader's light structs.

use cgmath::{InnerSpace, Matrix4, Vector3};

use crate::error::{LightError, Result};
use crate::gfx::context::{DepthTopology, GraphicsContext};
use crate::gfx::uniforms::{element_name, member_name, UniformSink};

use super::attenuation::Attenuation;
use super::color::LightColor;
use super::projection::{
    cube_face_transforms, directional_light_space, spot_light_space, OrthoProjection,
    PerspectiveProjection,
};
use super::settings::ShadowSettings;
use super::shadow::{ShadowParams, ShadowState};

/// Parallel rays along `direction`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub projection: OrthoProjection,
}

/// Omnidirectional light at `position`, shadowed through a cube map
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub attenuation: Attenuation,
    pub projection: PerspectiveProjection,
    /// Width over height of each cube face
    pub aspect: f32,
}

impl PointLight {
    pub fn far_plane(&self) -> f32 {
        self.projection.far
    }
}

/// Cone placement of a spot light
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpotCone {
    pub position: Vector3<f32>,
    pub direction: Vector3<f32>,
    /// Cosine of the inner cone half-angle
    pub cut_off: f32,
    /// Cosine of the outer cone half-angle
    pub outer_cut_off: f32,
}

impl SpotCone {
    /// Cone from half-angles in degrees
    pub fn from_degrees(
        position: Vector3<f32>,
        direction: Vector3<f32>,
        inner: f32,
        outer: f32,
    ) -> Self {
        Self {
            position,
            direction,
            cut_off: inner.to_radians().cos(),
            outer_cut_off: outer.to_radians().cos(),
        }
    }
}

/// Cone of light from `cone.position` along `cone.direction`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpotLight {
    pub cone: SpotCone,
    pub attenuation: Attenuation,
    pub projection: PerspectiveProjection,
}

impl SpotLight {
    /// Moves the cone, e.g. to follow the camera each frame
    ///
    /// # Errors
    /// A zero direction is rejected and the cone is left where it was.
    pub fn aim(&mut self, position: Vector3<f32>, direction: Vector3<f32>) -> Result<()> {
        check_direction(direction, "spot")?;
        self.cone.position = position;
        self.cone.direction = direction;
        Ok(())
    }
}

fn check_direction(direction: Vector3<f32>, light: &'static str) -> Result<()> {
    // Also false for NaN components
    if direction.magnitude2() > 0.0 {
        Ok(())
    } else {
        Err(LightError::DegenerateDirection { light })
    }
}

/// The kind-specific part of a light
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightKind {
    /// Color terms only; never casts shadows
    Base,
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl LightKind {
    /// Depth-target topology used when this kind casts shadows
    pub fn shadow_topology(&self) -> Option<DepthTopology> {
        match self {
            LightKind::Base => None,
            LightKind::Directional(_) | LightKind::Spot(_) => Some(DepthTopology::Texture2D),
            LightKind::Point(_) => Some(DepthTopology::CubeMap),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            LightKind::Base => "Light",
            LightKind::Directional(_) => "Directional Shadow Map",
            LightKind::Point(_) => "Point Shadow Cube Map",
            LightKind::Spot(_) => "Spot Shadow Map",
        }
    }
}

/// A light of any kind together with its optional shadow map
#[derive(Debug)]
pub struct Light {
    color: LightColor,
    kind: LightKind,
    shadow: Option<ShadowState>,
}

impl Light {
    /// Light that only contributes its color terms
    pub fn base(color: LightColor) -> Self {
        Self {
            color,
            kind: LightKind::Base,
            shadow: None,
        }
    }

    /// Directional light; allocates a 2D shadow map if `shadow` is enabled
    pub fn directional(
        ctx: &mut dyn GraphicsContext,
        color: LightColor,
        shadow: ShadowParams,
        direction: Vector3<f32>,
        settings: &ShadowSettings,
    ) -> Result<Self> {
        check_direction(direction, "directional")?;
        let kind = LightKind::Directional(DirectionalLight {
            direction,
            projection: settings.directional,
        });
        Self::with_shadow(ctx, color, kind, shadow, settings)
    }

    /// Point light; allocates a cube shadow map if `shadow` is enabled
    pub fn point(
        ctx: &mut dyn GraphicsContext,
        color: LightColor,
        shadow: ShadowParams,
        attenuation: Attenuation,
        position: Vector3<f32>,
        settings: &ShadowSettings,
    ) -> Result<Self> {
        let kind = LightKind::Point(PointLight {
            position,
            attenuation,
            projection: settings.point,
            aspect: settings.aspect(),
        });
        Self::with_shadow(ctx, color, kind, shadow, settings)
    }

    /// Spot light; allocates a 2D shadow map if `shadow` is enabled
    pub fn spot(
        ctx: &mut dyn GraphicsContext,
        color: LightColor,
        shadow: ShadowParams,
        attenuation: Attenuation,
        cone: SpotCone,
        settings: &ShadowSettings,
    ) -> Result<Self> {
        check_direction(cone.direction, "spot")?;
        let kind = LightKind::Spot(SpotLight {
            cone,
            attenuation,
            projection: settings.spot,
        });
        Self::with_shadow(ctx, color, kind, shadow, settings)
    }

    fn with_shadow(
        ctx: &mut dyn GraphicsContext,
        color: LightColor,
        kind: LightKind,
        params: ShadowParams,
        settings: &ShadowSettings,
    ) -> Result<Self> {
        let shadow = match kind.shadow_topology() {
            Some(topology) => Some(ShadowState::initialize(
                ctx,
                params,
                topology,
                settings,
                kind.label(),
            )?),
            None => None,
        };

        Ok(Self {
            color,
            kind,
            shadow,
        })
    }

    pub fn color(&self) -> &LightColor {
        &self.color
    }

    pub fn kind(&self) -> &LightKind {
        &self.kind
    }

    pub fn shadow(&self) -> Option<&ShadowState> {
        self.shadow.as_ref()
    }

    pub fn has_shadow(&self) -> bool {
        self.shadow.as_ref().is_some_and(ShadowState::has_shadow)
    }

    /// Array slot of a light whose shadow is enabled
    pub fn shadow_index(&self) -> Option<u32> {
        self.shadow
            .as_ref()
            .filter(|shadow| shadow.has_shadow())
            .map(ShadowState::index)
    }

    pub fn as_directional_mut(&mut self) -> Option<&mut DirectionalLight> {
        match &mut self.kind {
            LightKind::Directional(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_point_mut(&mut self) -> Option<&mut PointLight> {
        match &mut self.kind {
            LightKind::Point(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_spot_mut(&mut self) -> Option<&mut SpotLight> {
        match &mut self.kind {
            LightKind::Spot(light) => Some(light),
            _ => None,
        }
    }

    /// Writes every uniform member of this light under `name`
    ///
    /// Order: color terms, shadow fields, attenuation, then the kind's own
    /// placement fields.
    pub fn write_uniforms(&self, sink: &mut dyn UniformSink, name: &str) {
        self.color.write_uniforms(sink, name);
        if let Some(shadow) = &self.shadow {
            shadow.write_uniforms(sink, name);
        }

        match &self.kind {
            LightKind::Base => {}
            LightKind::Directional(light) => {
                sink.set_vec3(&member_name(name, "direction"), light.direction);
            }
            LightKind::Point(light) => {
                light.attenuation.write_uniforms(sink, name);
                sink.set_vec3(&member_name(name, "position"), light.position);
                sink.set_float(&member_name(name, "farPlane"), light.far_plane());
            }
            LightKind::Spot(light) => {
                light.attenuation.write_uniforms(sink, name);
                sink.set_vec3(&member_name(name, "position"), light.cone.position);
                sink.set_vec3(&member_name(name, "direction"), light.cone.direction);
                sink.set_float(&member_name(name, "cutOff"), light.cone.cut_off);
                sink.set_float(&member_name(name, "outerCutOff"), light.cone.outer_cut_off);
            }
        }
    }

    /// Writes this light as element `index` of the uniform array `array`
    pub fn write_uniforms_at(&self, sink: &mut dyn UniformSink, array: &str, index: usize) {
        self.write_uniforms(sink, &element_name(array, index));
    }

    /// Projection half of the shadow transform
    ///
    /// For point lights this is the per-face perspective shared by all six
    /// cube faces.
    pub fn shadow_projection(&self) -> Option<Matrix4<f32>> {
        match &self.kind {
            LightKind::Base => None,
            LightKind::Directional(light) => Some(light.projection.matrix()),
            LightKind::Point(light) => Some(light.projection.matrix(light.aspect)),
            LightKind::Spot(light) => Some(light.projection.matrix(1.0)),
        }
    }

    /// Projection × view into the 2D shadow map of a directional or spot light
    pub fn light_space_matrix(&self) -> Option<Matrix4<f32>> {
        match &self.kind {
            LightKind::Directional(light) => {
                Some(directional_light_space(light.direction, &light.projection))
            }
            LightKind::Spot(light) => Some(spot_light_space(
                light.cone.position,
                light.cone.direction,
                &light.projection,
            )),
            LightKind::Base | LightKind::Point(_) => None,
        }
    }

    /// Projection × view for each cube face of a point light (+X, -X, +Y, -Y, +Z, -Z)
    pub fn shadow_transforms(&self) -> Option<[Matrix4<f32>; 6]> {
        match &self.kind {
            LightKind::Point(light) => Some(cube_face_transforms(
                light.position,
                &light.projection,
                light.aspect,
            )),
            _ => None,
        }
    }

    /// Renders this light's depth map; a no-op for lights without a shadow
    pub fn render_depth_map(&self, ctx: &mut dyn GraphicsContext, draw: &mut dyn FnMut()) {
        if let Some(shadow) = &self.shadow {
            shadow.render_depth_map(ctx, draw);
        }
    }

    /// Binds the depth map for sampling; a no-op for lights without a shadow
    pub fn bind_shadow_map(&self, ctx: &mut dyn GraphicsContext) {
        if let Some(shadow) = &self.shadow {
            shadow.bind_shadow_map(ctx);
        }
    }
}
