//! Graphics context seam
//!
//! Lights never talk to a graphics API directly. Everything they need from the
//! driver goes through [`GraphicsContext`]: depth render-target allocation and
//! the small amount of global binding state (viewport, framebuffer, cull mode,
//! active texture unit) that a depth pass has to change and put back.

use std::fmt;

use wgpu::Face;

use crate::error::Result;

/// Identifier of a framebuffer known to the context
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub u32);

impl FramebufferId {
    /// The window's own framebuffer
    pub const DEFAULT: FramebufferId = FramebufferId(0);
}

/// Identifier of a texture known to the context
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Layout of a depth render target
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DepthTopology {
    /// Single 2D depth texture (directional and spot lights)
    Texture2D,
    /// Six-faced cube depth texture (point lights)
    CubeMap,
}

impl DepthTopology {
    /// Number of texture layers backing the target
    pub fn layers(self) -> u32 {
        match self {
            DepthTopology::Texture2D => 1,
            DepthTopology::CubeMap => 6,
        }
    }

    /// View dimension used when the depth texture is sampled
    pub fn view_dimension(self) -> wgpu::TextureViewDimension {
        match self {
            DepthTopology::Texture2D => wgpu::TextureViewDimension::D2,
            DepthTopology::CubeMap => wgpu::TextureViewDimension::Cube,
        }
    }
}

/// Rectangle of the render target that rasterization writes to
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Viewport covering a `width` × `height` target from the origin
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Request for a depth-only render target
#[derive(Copy, Clone, Debug)]
pub struct DepthTargetDesc<'a> {
    pub label: &'a str,
    pub topology: DepthTopology,
    pub width: u32,
    pub height: u32,
}

/// Owned handle to a depth render target
///
/// The backend attaches a release hook when it hands the target out; the hook
/// runs exactly once, when the handle is dropped. Lights own their target, so
/// the GPU resource never outlives the light.
pub struct DepthTarget {
    framebuffer: FramebufferId,
    texture: TextureId,
    topology: DepthTopology,
    width: u32,
    height: u32,
    release: Option<Box<dyn FnOnce()>>,
}

impl DepthTarget {
    pub fn new(
        framebuffer: FramebufferId,
        texture: TextureId,
        desc: &DepthTargetDesc<'_>,
    ) -> Self {
        Self {
            framebuffer,
            texture,
            topology: desc.topology,
            width: desc.width,
            height: desc.height,
            release: None,
        }
    }

    /// Attaches the hook that frees the backend resource (builder pattern)
    pub fn on_release(mut self, release: impl FnOnce() + 'static) -> Self {
        self.release = Some(Box::new(release));
        self
    }

    pub fn framebuffer(&self) -> FramebufferId {
        self.framebuffer
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn topology(&self) -> DepthTopology {
        self.topology
    }

    /// Resolution in pixels of each face
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for DepthTarget {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            log::debug!(
                "Releasing {:?} depth target (framebuffer {}, texture {})",
                self.topology,
                self.framebuffer.0,
                self.texture.0
            );
            release();
        }
    }
}

impl fmt::Debug for DepthTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepthTarget")
            .field("framebuffer", &self.framebuffer)
            .field("texture", &self.texture)
            .field("topology", &self.topology)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("release", &self.release.is_some())
            .finish()
    }
}

/// Render-target allocation and global binding state of the graphics driver
///
/// Implementations are single-threaded: the state is shared by every
/// component on the render thread, and whoever changes it puts it back.
pub trait GraphicsContext {
    /// Allocates a depth-only render target
    ///
    /// Returns [`LightError::IncompleteRenderTarget`](crate::error::LightError)
    /// when the driver cannot produce a complete target.
    fn create_depth_target(&mut self, desc: &DepthTargetDesc<'_>) -> Result<DepthTarget>;

    fn viewport(&self) -> Viewport;
    fn set_viewport(&mut self, viewport: Viewport);

    fn framebuffer(&self) -> FramebufferId;
    fn bind_framebuffer(&mut self, framebuffer: FramebufferId);

    /// Clears the depth attachment of the bound framebuffer to the far plane
    fn clear_depth(&mut self);

    /// Face culled by rasterization, `None` when culling is disabled
    fn cull_face(&self) -> Option<Face>;
    fn set_cull_face(&mut self, face: Option<Face>);

    fn active_texture_unit(&self) -> u32;
    fn set_active_texture_unit(&mut self, unit: u32);

    /// Binds a depth texture to the active texture unit for sampling
    fn bind_texture(&mut self, topology: DepthTopology, texture: TextureId);
}
