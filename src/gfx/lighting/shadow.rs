//! Shadow-map ownership and the depth-pass protocol
//!
//! A [`ShadowState`] moves through a small lifecycle:
//!
//! - **Unshadowed** - shadows disabled, no render target exists
//! - **Initialized** - depth target allocated once, at light construction
//! - **Bound for depth pass** - viewport, framebuffer and cull mode switched
//!   for the duration of [`ShadowState::render_depth_map`]
//! - **Restored** - the previous binding state is back in place
//!
//! The lit pass then samples the map through [`ShadowState::bind_shadow_map`].

use wgpu::Face;

use crate::error::{LightError, Result};
use crate::gfx::context::{
    DepthTarget, DepthTargetDesc, DepthTopology, FramebufferId, GraphicsContext, Viewport,
};
use crate::gfx::uniforms::{member_name, UniformSink};

use super::settings::ShadowSettings;

/// Shadow configuration of a light as requested by the caller
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShadowParams {
    pub enabled: bool,
    /// Texture unit the lit shader samples this light's map from
    pub map_slot: u32,
    /// Element of the lit shader's `lightSpaceMatrix` array
    pub index: u32,
}

impl ShadowParams {
    pub fn enabled(map_slot: u32, index: u32) -> Self {
        Self {
            enabled: true,
            map_slot,
            index,
        }
    }

    pub fn disabled(map_slot: u32, index: u32) -> Self {
        Self {
            enabled: false,
            map_slot,
            index,
        }
    }
}

/// Shadow capability of a light
///
/// Owns the depth target when shadows are enabled; the target is released
/// when the state (and therefore the light) is dropped.
#[derive(Debug)]
pub struct ShadowState {
    map_slot: u32,
    index: u32,
    target: Option<DepthTarget>,
}

impl ShadowState {
    /// Builds the shadow state and, if enabled, allocates its depth target
    ///
    /// # Errors
    /// Returns [`LightError::InvalidShadowResolution`] for a zero-sized map and
    /// forwards [`LightError::IncompleteRenderTarget`] from the context.
    pub fn initialize(
        ctx: &mut dyn GraphicsContext,
        params: ShadowParams,
        topology: DepthTopology,
        settings: &ShadowSettings,
        label: &str,
    ) -> Result<Self> {
        let target = if params.enabled {
            if settings.width == 0 || settings.height == 0 {
                return Err(LightError::InvalidShadowResolution {
                    width: settings.width,
                    height: settings.height,
                });
            }

            let target = ctx.create_depth_target(&DepthTargetDesc {
                label,
                topology,
                width: settings.width,
                height: settings.height,
            })?;
            log::debug!(
                "Allocated {}x{} {:?} shadow map '{}' for texture unit {}",
                settings.width,
                settings.height,
                topology,
                label,
                params.map_slot
            );
            Some(target)
        } else {
            None
        };

        Ok(Self {
            map_slot: params.map_slot,
            index: params.index,
            target,
        })
    }

    pub fn has_shadow(&self) -> bool {
        self.target.is_some()
    }

    pub fn map_slot(&self) -> u32 {
        self.map_slot
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn target(&self) -> Option<&DepthTarget> {
        self.target.as_ref()
    }

    /// Writes `name.hasShadow`, `name.shadowMap` and `name.shadowIndex`
    pub fn write_uniforms(&self, sink: &mut dyn UniformSink, name: &str) {
        sink.set_bool(&member_name(name, "hasShadow"), self.has_shadow());
        sink.set_int(&member_name(name, "shadowMap"), self.map_slot as i32);
        sink.set_int(&member_name(name, "shadowIndex"), self.index as i32);
    }

    /// Renders the scene into this light's depth map
    ///
    /// Without a shadow this returns immediately: `draw` is not called and the
    /// context is untouched, so render loops may call it for every light.
    /// Otherwise the depth target is bound with front-face culling, `draw`
    /// runs once, and the previous viewport, framebuffer and cull mode are
    /// restored before returning (also if `draw` panics).
    pub fn render_depth_map(&self, ctx: &mut dyn GraphicsContext, draw: &mut dyn FnMut()) {
        let Some(target) = &self.target else {
            return;
        };

        let _pass = DepthPass::begin(ctx, target);
        draw();
    }

    /// Binds the depth texture to `map_slot` for sampling by the lit pass
    ///
    /// The previously active texture unit is selected again afterwards.
    pub fn bind_shadow_map(&self, ctx: &mut dyn GraphicsContext) {
        let Some(target) = &self.target else {
            return;
        };

        let previous = ctx.active_texture_unit();
        ctx.set_active_texture_unit(self.map_slot);
        ctx.bind_texture(target.topology(), target.texture());
        ctx.set_active_texture_unit(previous);
    }
}

/// Binding state captured for the duration of a depth pass
struct DepthPass<'a> {
    ctx: &'a mut dyn GraphicsContext,
    viewport: Viewport,
    framebuffer: FramebufferId,
    cull_face: Option<Face>,
}

impl<'a> DepthPass<'a> {
    fn begin(ctx: &'a mut dyn GraphicsContext, target: &DepthTarget) -> Self {
        let viewport = ctx.viewport();
        let framebuffer = ctx.framebuffer();
        let cull_face = ctx.cull_face();

        let (width, height) = target.size();
        ctx.set_viewport(Viewport::sized(width, height));
        ctx.bind_framebuffer(target.framebuffer());
        ctx.clear_depth();
        // Back faces only: keeps surfaces facing the light out of the map
        ctx.set_cull_face(Some(Face::Front));

        Self {
            ctx,
            viewport,
            framebuffer,
            cull_face,
        }
    }
}

impl Drop for DepthPass<'_> {
    fn drop(&mut self) {
        self.ctx.set_cull_face(self.cull_face);
        self.ctx.bind_framebuffer(self.framebuffer);
        self.ctx.set_viewport(self.viewport);
    }
}
