//! wgpu implementation of [`GraphicsContext`]
//!
//! wgpu has no global binding state, so the context tracks it: the bound
//! framebuffer, viewport, cull mode and texture units are recorded here and
//! read back by whoever encodes the actual passes. Depth targets are real
//! `Depth32Float` textures owned by the context and dropped when the light's
//! [`DepthTarget`] handle is released.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use wgpu::Face;

use crate::error::{LightError, Result};
use crate::gfx::context::{
    DepthTarget, DepthTargetDesc, DepthTopology, FramebufferId, GraphicsContext, TextureId,
    Viewport,
};
use crate::gfx::resources::TextureResource;

type TargetMap = HashMap<FramebufferId, TextureResource>;

/// Graphics context backed by a wgpu device
pub struct WgpuContext {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    targets: Rc<RefCell<TargetMap>>,
    viewport: Viewport,
    framebuffer: FramebufferId,
    cull_face: Option<Face>,
    active_unit: u32,
    texture_units: HashMap<u32, (DepthTopology, TextureId)>,
    next_id: u32,
}

impl WgpuContext {
    /// Creates a context whose default framebuffer is `viewport` sized
    ///
    /// # Arguments
    /// * `device` - WGPU device used to allocate shadow maps
    /// * `queue` - WGPU queue used for depth clears
    /// * `viewport` - Initial viewport of the window's framebuffer
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>, viewport: Viewport) -> Self {
        Self {
            device,
            queue,
            targets: Rc::new(RefCell::new(HashMap::new())),
            viewport,
            framebuffer: FramebufferId::DEFAULT,
            cull_face: Some(Face::Back),
            active_unit: 0,
            texture_units: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Number of shadow maps currently alive
    pub fn target_count(&self) -> usize {
        self.targets.borrow().len()
    }

    /// Per-layer depth attachment views of a shadow map
    ///
    /// Render loops clone these for a light before its depth pass and move
    /// them into the draw callback, which encodes one render pass per view
    /// (six for cube maps, in +X, -X, +Y, -Y, +Z, -Z order).
    pub fn attachment_views(&self, framebuffer: FramebufferId) -> Option<Vec<wgpu::TextureView>> {
        self.targets
            .borrow()
            .get(&framebuffer)
            .map(|target| target.face_views.clone())
    }

    /// Sampling view and comparison sampler bound to `unit`, if any
    pub fn sampled_texture(&self, unit: u32) -> Option<(wgpu::TextureView, wgpu::Sampler)> {
        let (_, texture) = self.texture_units.get(&unit)?;
        self.targets
            .borrow()
            .get(&FramebufferId(texture.0))
            .map(|target| (target.view.clone(), target.sampler.clone()))
    }

    /// Topology and texture bound to `unit`
    pub fn texture_unit(&self, unit: u32) -> Option<(DepthTopology, TextureId)> {
        self.texture_units.get(&unit).copied()
    }
}

impl GraphicsContext for WgpuContext {
    fn create_depth_target(&mut self, desc: &DepthTargetDesc<'_>) -> Result<DepthTarget> {
        TextureResource::validate(&self.device.limits(), desc).map_err(|reason| {
            log::error!("Shadow map '{}' is incomplete: {}", desc.label, reason);
            LightError::IncompleteRenderTarget {
                label: desc.label.to_owned(),
                reason,
            }
        })?;

        // One texture per framebuffer, so both share the id
        let id = self.next_id;
        self.next_id += 1;
        let framebuffer = FramebufferId(id);
        let resource = TextureResource::create_shadow_map(&self.device, desc);
        self.targets.borrow_mut().insert(framebuffer, resource);

        let targets = Rc::downgrade(&self.targets);
        Ok(
            DepthTarget::new(framebuffer, TextureId(id), desc).on_release(move || {
                if let Some(targets) = targets.upgrade() {
                    targets.borrow_mut().remove(&framebuffer);
                }
            }),
        )
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn framebuffer(&self) -> FramebufferId {
        self.framebuffer
    }

    fn bind_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.framebuffer = framebuffer;
    }

    fn clear_depth(&mut self) {
        let targets = self.targets.borrow();
        let Some(target) = targets.get(&self.framebuffer) else {
            // The window's depth buffer belongs to the surface owner
            log::trace!("clear_depth on framebuffer {} skipped", self.framebuffer.0);
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Shadow Map Clear Encoder"),
            });
        for view in &target.face_views {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Map Clear Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn cull_face(&self) -> Option<Face> {
        self.cull_face
    }

    fn set_cull_face(&mut self, face: Option<Face>) {
        self.cull_face = face;
    }

    fn active_texture_unit(&self) -> u32 {
        self.active_unit
    }

    fn set_active_texture_unit(&mut self, unit: u32) {
        self.active_unit = unit;
    }

    fn bind_texture(&mut self, topology: DepthTopology, texture: TextureId) {
        self.texture_units
            .insert(self.active_unit, (topology, texture));
    }
}
