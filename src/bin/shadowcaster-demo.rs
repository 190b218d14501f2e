//! Headless shadow frame
//!
//! Builds the directional, point and spot lights of the shadow-mapping demo
//! scene on a real wgpu device, renders one frame of shadow maps and uploads
//! the lit-pass uniforms. Run with `RUST_LOG=debug` to follow the passes.

use std::sync::Arc;

use anyhow::Context;
use shadowcaster::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    pollster::block_on(run())
}

async fn run() -> anyhow::Result<()> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .context("Failed to request adapter!")?;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("WGPU Device"),
            required_features: wgpu::Features::default(),
            required_limits: wgpu::Limits {
                max_texture_dimension_2d: 4096,
                ..wgpu::Limits::downlevel_defaults()
            },
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        })
        .await
        .context("Failed to request a device!")?;

    let mut ctx = WgpuContext::new(Arc::new(device), Arc::new(queue), Viewport::sized(800, 800));
    let mut rig = LightRig::default();
    let settings = *rig.settings();

    let color = LightColor::new(
        Vector3::new(0.05, 0.05, 0.05),
        Vector3::new(0.25, 0.25, 0.25),
        Vector3::new(1.0, 1.0, 1.0),
    );

    let sun = Light::directional(
        &mut ctx,
        color,
        ShadowParams::enabled(2, rig.next_shadow_index()),
        Vector3::new(-2.0, -4.0, -1.0),
        &settings,
    )?;
    rig.add(sun)?;

    let lamp = Light::point(
        &mut ctx,
        color,
        ShadowParams::enabled(3, rig.next_shadow_index()),
        Attenuation::new(1.0, 0.09, 0.032),
        Vector3::new(2.0, 2.0, 2.0),
        &settings,
    )?;
    rig.add(lamp)?;

    // Flashlight held by the camera at (0, 0, 5) looking down -Z
    let flashlight = Light::spot(
        &mut ctx,
        LightColor::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.35, 0.35, 0.35),
            Vector3::new(1.0, 1.0, 1.0),
        ),
        ShadowParams::disabled(4, rig.next_shadow_index()),
        Attenuation::new(1.0, 0.09, 0.032),
        SpotCone::from_degrees(
            Vector3::new(0.0, 0.0, 5.0),
            Vector3::new(0.0, 0.0, -1.0),
            12.5,
            15.0,
        ),
        &settings,
    )?;
    rig.add(flashlight)?;

    log::info!(
        "Rig ready: {} lights, {} shadow maps allocated",
        rig.lights().count(),
        ctx.target_count()
    );

    let mut depth = UniformTable::new();
    let mut cube_depth = UniformTable::new();
    let mut lit = UniformTable::new();
    let mut flat_passes = 0;
    let mut cube_passes = 0;

    rig.render_shadow_maps(
        &mut ctx,
        &mut depth,
        &mut cube_depth,
        &mut || flat_passes += 1,
        &mut || cube_passes += 1,
    );
    rig.upload(&mut ctx, &mut lit);

    let mut matrices = ShadowMatricesBuffer::new(ctx.device());
    matrices.update_content(ctx.queue(), rig.shadow_matrices());

    log::info!(
        "Frame done: {} 2D and {} cube depth passes, {} lit uniforms, {} byte shadow matrix block",
        flat_passes,
        cube_passes,
        lit.len(),
        matrices.size()
    );
    for (name, value) in lit.writes() {
        log::debug!("{} = {:?}", name, value);
    }

    Ok(())
}
