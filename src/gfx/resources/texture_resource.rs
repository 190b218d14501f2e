//! Texture resource management for wgpu
//!
//! Provides utilities for creating GPU depth textures, views, and samplers
//! for shadow maps, in both 2D and cube-map layouts.

use crate::gfx::context::{DepthTargetDesc, DepthTopology};

/// GPU texture resource backing a shadow map
///
/// Bundles the components needed to render into and sample from a depth map:
/// - Texture: The actual GPU memory allocation
/// - View: Sampling view (2D or cube, matching the topology)
/// - Face views: One 2D attachment view per layer, used as depth attachments
/// - Sampler: Depth comparison sampler
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub face_views: Vec<wgpu::TextureView>,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth-only shadow map render target
    ///
    /// Point-light targets get six layers viewed as a cube; everything else
    /// is a single 2D layer.
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    /// * `desc` - Label, topology and per-face resolution
    ///
    /// # Returns
    /// TextureResource usable both as depth attachment and sampled texture
    pub fn create_shadow_map(device: &wgpu::Device, desc: &DepthTargetDesc<'_>) -> Self {
        let layers = desc.topology.layers();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(desc.label),
            dimension: Some(desc.topology.view_dimension()),
            ..Default::default()
        });

        let face_views = (0..layers)
            .map(|layer| {
                texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some(&format!("{} Face {}", desc.label, layer)),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    base_array_layer: layer,
                    array_layer_count: Some(1),
                    ..Default::default()
                })
            })
            .collect();

        // Shadow maps need a comparison sampler; nearest keeps texel edges crisp
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            face_views,
            sampler,
        }
    }

    /// Checks a shadow map request against device limits
    ///
    /// Returns a human-readable reason when the target could not be complete.
    pub fn validate(limits: &wgpu::Limits, desc: &DepthTargetDesc<'_>) -> Result<(), String> {
        let max = limits.max_texture_dimension_2d;
        if desc.width == 0 || desc.height == 0 {
            return Err(format!("zero-sized {}x{} depth target", desc.width, desc.height));
        }
        if desc.width > max || desc.height > max {
            return Err(format!(
                "{}x{} exceeds the device limit of {}",
                desc.width, desc.height, max
            ));
        }
        if desc.topology == DepthTopology::CubeMap && desc.width != desc.height {
            return Err(format!(
                "cube map faces must be square, got {}x{}",
                desc.width, desc.height
            ));
        }
        Ok(())
    }
}
