//! In-memory graphics context for unit tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wgpu::Face;

use crate::error::{LightError, Result};
use crate::gfx::context::{
    DepthTarget, DepthTargetDesc, DepthTopology, FramebufferId, GraphicsContext, TextureId,
    Viewport,
};

/// Every state-changing call a light can make on the context
#[derive(Clone, Debug, PartialEq)]
pub enum ContextCall {
    CreateDepthTarget {
        topology: DepthTopology,
        width: u32,
        height: u32,
    },
    SetViewport(Viewport),
    BindFramebuffer(FramebufferId),
    ClearDepth,
    SetCullFace(Option<Face>),
    SetActiveTextureUnit(u32),
    BindTexture(DepthTopology, TextureId),
    Release(FramebufferId),
}

/// Tracks binding state like a driver would and records every call
pub struct RecordingContext {
    calls: Rc<RefCell<Vec<ContextCall>>>,
    live_targets: Rc<Cell<usize>>,
    viewport: Viewport,
    framebuffer: FramebufferId,
    cull_face: Option<Face>,
    active_unit: u32,
    next_id: u32,
    failure: Option<String>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            live_targets: Rc::new(Cell::new(0)),
            viewport: Viewport::sized(800, 800),
            framebuffer: FramebufferId::DEFAULT,
            cull_face: Some(Face::Back),
            active_unit: 0,
            next_id: 1,
            failure: None,
        }
    }

    /// Context whose depth targets always come back incomplete
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_owned()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<ContextCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Targets handed out and not yet released
    pub fn live_targets(&self) -> usize {
        self.live_targets.get()
    }

    fn record(&self, call: ContextCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl GraphicsContext for RecordingContext {
    fn create_depth_target(&mut self, desc: &DepthTargetDesc<'_>) -> Result<DepthTarget> {
        self.record(ContextCall::CreateDepthTarget {
            topology: desc.topology,
            width: desc.width,
            height: desc.height,
        });
        if let Some(reason) = &self.failure {
            return Err(LightError::IncompleteRenderTarget {
                label: desc.label.to_owned(),
                reason: reason.clone(),
            });
        }

        let framebuffer = FramebufferId(self.next_id);
        let texture = TextureId(self.next_id);
        self.next_id += 1;
        self.live_targets.set(self.live_targets.get() + 1);

        let calls = self.calls.clone();
        let live_targets = self.live_targets.clone();
        Ok(
            DepthTarget::new(framebuffer, texture, desc).on_release(move || {
                calls.borrow_mut().push(ContextCall::Release(framebuffer));
                live_targets.set(live_targets.get() - 1);
            }),
        )
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.record(ContextCall::SetViewport(viewport));
        self.viewport = viewport;
    }

    fn framebuffer(&self) -> FramebufferId {
        self.framebuffer
    }

    fn bind_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.record(ContextCall::BindFramebuffer(framebuffer));
        self.framebuffer = framebuffer;
    }

    fn clear_depth(&mut self) {
        self.record(ContextCall::ClearDepth);
    }

    fn cull_face(&self) -> Option<Face> {
        self.cull_face
    }

    fn set_cull_face(&mut self, face: Option<Face>) {
        self.record(ContextCall::SetCullFace(face));
        self.cull_face = face;
    }

    fn active_texture_unit(&self) -> u32 {
        self.active_unit
    }

    fn set_active_texture_unit(&mut self, unit: u32) {
        self.record(ContextCall::SetActiveTextureUnit(unit));
        self.active_unit = unit;
    }

    fn bind_texture(&mut self, topology: DepthTopology, texture: TextureId) {
        self.record(ContextCall::BindTexture(topology, texture));
    }
}

/// Asserts two matrices match element-wise within `1e-5`
pub fn assert_mat_close(actual: &cgmath::Matrix4<f32>, expected: &cgmath::Matrix4<f32>) {
    let a: &[f32; 16] = actual.as_ref();
    let e: &[f32; 16] = expected.as_ref();
    assert!(
        a.iter().all(|v| v.is_finite()),
        "matrix has non-finite elements: {:?}",
        actual
    );
    assert!(
        e.iter().all(|v| v.is_finite()),
        "expected matrix has non-finite elements: {:?}",
        expected
    );
    for i in 0..16 {
        assert!(
            (a[i] - e[i]).abs() < 1e-5,
            "matrices differ at element {}: {:?} vs {:?}",
            i,
            actual,
            expected
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Matrix4, SquareMatrix};

    #[test]
    #[should_panic(expected = "non-finite")]
    fn test_assert_mat_close_reports_nan() {
        let nan = Matrix4::from_scale(f32::NAN);
        assert_mat_close(&nan, &nan);
    }

    #[test]
    fn test_assert_mat_close_accepts_rounding() {
        let a = Matrix4::<f32>::identity();
        let b = Matrix4::from_scale(1.0 + 1e-7);
        assert_mat_close(&a, &b);
    }
}
