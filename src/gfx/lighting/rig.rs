//! Frame-level light management
//!
//! A [`LightRig`] owns every light in the scene and drives them through the
//! fixed per-frame order: render all shadow maps, then upload lights and bind
//! shadow maps for the lit pass.

use std::collections::BTreeSet;

use cgmath::{Matrix4, SquareMatrix};

use crate::error::{LightError, Result};
use crate::gfx::context::GraphicsContext;
use crate::gfx::uniforms::{element_name, UniformSink};

use super::light::{Light, LightKind};
use super::settings::{ShadowSettings, MAX_SHADOW_MAPS};

/// Light-space matrices laid out for a uniform buffer
///
/// Element `i` belongs to the shadowed light with shadow index `i`. Slots of
/// point lights, which sample cube maps instead, hold the identity.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowMatrices {
    pub light_space: [[[f32; 4]; 4]; MAX_SHADOW_MAPS],
    pub count: u32,
    _padding: [u32; 3],
}

impl Default for ShadowMatrices {
    fn default() -> Self {
        Self {
            light_space: [Matrix4::<f32>::identity().into(); MAX_SHADOW_MAPS],
            count: 0,
            _padding: [0; 3],
        }
    }
}

/// All lights of a scene, grouped the way the lit shader declares them
pub struct LightRig {
    settings: ShadowSettings,
    base: Vec<Light>,
    directional: Vec<Light>,
    point: Vec<Light>,
    spot: Vec<Light>,
    shadow_indices: BTreeSet<u32>,
}

impl LightRig {
    pub fn new(settings: ShadowSettings) -> Self {
        Self {
            settings,
            base: Vec::new(),
            directional: Vec::new(),
            point: Vec::new(),
            spot: Vec::new(),
            shadow_indices: BTreeSet::new(),
        }
    }

    /// Settings lights of this rig should be built with
    pub fn settings(&self) -> &ShadowSettings {
        &self.settings
    }

    /// Lowest shadow index not claimed by a shadowed light
    ///
    /// Using this for every new shadowed light keeps indices dense.
    pub fn next_shadow_index(&self) -> u32 {
        (0..)
            .find(|index| !self.shadow_indices.contains(index))
            .unwrap_or_default()
    }

    /// Number of lights currently casting shadows
    pub fn shadow_count(&self) -> usize {
        self.shadow_indices.len()
    }

    /// Adds a light to the array matching its kind
    ///
    /// # Errors
    /// A shadowed light must use an index below [`MAX_SHADOW_MAPS`] that no
    /// other shadowed light in the rig uses, and that index must be
    /// [`next_shadow_index`](Self::next_shadow_index). The lit shader reads
    /// `lightSpaceMatrix[0..numShadows]`, so indices have to stay dense.
    pub fn add(&mut self, light: Light) -> Result<()> {
        if let Some(index) = light.shadow_index() {
            if index as usize >= MAX_SHADOW_MAPS {
                return Err(LightError::ShadowIndexOutOfRange {
                    index,
                    capacity: MAX_SHADOW_MAPS as u32,
                });
            }
            if self.shadow_indices.contains(&index) {
                return Err(LightError::ShadowIndexInUse { index });
            }
            let expected = self.next_shadow_index();
            if index != expected {
                return Err(LightError::ShadowIndexNotDense { index, expected });
            }
            self.shadow_indices.insert(index);
        }

        match light.kind() {
            LightKind::Base => self.base.push(light),
            LightKind::Directional(_) => self.directional.push(light),
            LightKind::Point(_) => self.point.push(light),
            LightKind::Spot(_) => self.spot.push(light),
        }
        Ok(())
    }

    pub fn base_lights(&self) -> &[Light] {
        &self.base
    }

    pub fn directional_lights(&self) -> &[Light] {
        &self.directional
    }

    pub fn point_lights(&self) -> &[Light] {
        &self.point
    }

    pub fn spot_lights(&self) -> &[Light] {
        &self.spot
    }

    /// Spot lights, mutable so they can be re-aimed each frame
    pub fn spot_lights_mut(&mut self) -> &mut [Light] {
        &mut self.spot
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.base
            .iter()
            .chain(&self.directional)
            .chain(&self.point)
            .chain(&self.spot)
    }

    /// Renders the depth map of every shadowed light
    ///
    /// Directional and spot lights write `lightSpaceMatrix` to `flat_depth`
    /// and then run `draw_flat` against their 2D map. Point lights write
    /// `shadowTransforms[0..6]`, `farPlane` and `lightPos` to `cube_depth` and
    /// then run `draw_cube` against their cube map. Each callback runs once
    /// per shadowed light of its kind. Must finish before the lit pass
    /// samples the maps.
    pub fn render_shadow_maps(
        &self,
        ctx: &mut dyn GraphicsContext,
        flat_depth: &mut dyn UniformSink,
        cube_depth: &mut dyn UniformSink,
        draw_flat: &mut dyn FnMut(),
        draw_cube: &mut dyn FnMut(),
    ) {
        let mut rendered = 0;

        for light in self.directional.iter().chain(&self.spot) {
            if !light.has_shadow() {
                continue;
            }
            if let Some(matrix) = light.light_space_matrix() {
                flat_depth.set_mat4("lightSpaceMatrix", &matrix);
            }
            light.render_depth_map(ctx, draw_flat);
            rendered += 1;
        }

        for light in &self.point {
            if !light.has_shadow() {
                continue;
            }
            let LightKind::Point(point) = light.kind() else {
                continue;
            };
            if let Some(transforms) = light.shadow_transforms() {
                for (face, transform) in transforms.iter().enumerate() {
                    cube_depth.set_mat4(&element_name("shadowTransforms", face), transform);
                }
            }
            cube_depth.set_float("farPlane", point.far_plane());
            cube_depth.set_vec3("lightPos", point.position);
            light.render_depth_map(ctx, draw_cube);
            rendered += 1;
        }

        log::trace!("Rendered {} shadow maps", rendered);
    }

    /// Uploads every light to the lit shader and binds all shadow maps
    pub fn upload(&self, ctx: &mut dyn GraphicsContext, lit: &mut dyn UniformSink) {
        lit.set_int("numLights", self.base.len() as i32);
        lit.set_int("numDirLights", self.directional.len() as i32);
        lit.set_int("numPointLights", self.point.len() as i32);
        lit.set_int("numSpotLights", self.spot.len() as i32);
        lit.set_int("numShadows", self.shadow_count() as i32);

        for (i, light) in self.base.iter().enumerate() {
            light.write_uniforms_at(lit, "lights", i);
        }
        for (array, lights) in [
            ("dirLights", &self.directional),
            ("pointLights", &self.point),
            ("spotLights", &self.spot),
        ] {
            for (i, light) in lights.iter().enumerate() {
                light.bind_shadow_map(ctx);
                light.write_uniforms_at(lit, array, i);
                if let (Some(index), Some(matrix)) =
                    (light.shadow_index(), light.light_space_matrix())
                {
                    lit.set_mat4(&element_name("lightSpaceMatrix", index as usize), &matrix);
                }
            }
        }
    }

    /// Light-space matrices of all shadowed lights, indexed by shadow index
    pub fn shadow_matrices(&self) -> ShadowMatrices {
        let mut matrices = ShadowMatrices {
            count: self.shadow_count() as u32,
            ..Default::default()
        };
        for light in self.directional.iter().chain(&self.spot) {
            if let (Some(index), Some(matrix)) = (light.shadow_index(), light.light_space_matrix())
            {
                matrices.light_space[index as usize] = matrix.into();
            }
        }
        matrices
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::new(ShadowSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::lighting::{Attenuation, LightColor, ShadowParams, SpotCone};
    use crate::gfx::testing::{assert_mat_close, ContextCall, RecordingContext};
    use crate::gfx::uniforms::{UniformTable, UniformValue};
    use cgmath::Vector3;

    fn color() -> LightColor {
        LightColor::new(
            Vector3::new(0.05, 0.05, 0.05),
            Vector3::new(0.25, 0.25, 0.25),
            Vector3::new(1.0, 1.0, 1.0),
        )
    }

    fn directional(ctx: &mut RecordingContext, rig: &LightRig, index: u32) -> Light {
        Light::directional(
            ctx,
            color(),
            ShadowParams::enabled(2 + index, index),
            Vector3::new(-2.0, -4.0, -1.0 - index as f32),
            rig.settings(),
        )
        .unwrap()
    }

    /// The light set of the shadow-mapping demo scene
    fn demo_rig(ctx: &mut RecordingContext) -> LightRig {
        let mut rig = LightRig::default();
        let settings = *rig.settings();

        let dir = Light::directional(
            ctx,
            color(),
            ShadowParams::enabled(2, rig.next_shadow_index()),
            Vector3::new(-2.0, -4.0, -1.0),
            &settings,
        )
        .unwrap();
        rig.add(dir).unwrap();

        let point = Light::point(
            ctx,
            color(),
            ShadowParams::enabled(3, rig.next_shadow_index()),
            Attenuation::new(1.0, 0.09, 0.032),
            Vector3::new(2.0, 2.0, 2.0),
            &settings,
        )
        .unwrap();
        rig.add(point).unwrap();

        let spot = Light::spot(
            ctx,
            color(),
            ShadowParams::disabled(4, rig.next_shadow_index()),
            Attenuation::new(1.0, 0.09, 0.032),
            SpotCone::from_degrees(
                Vector3::new(0.0, 0.0, 5.0),
                Vector3::new(0.0, 0.0, -1.0),
                12.5,
                15.0,
            ),
            &settings,
        )
        .unwrap();
        rig.add(spot).unwrap();

        rig
    }

    #[test]
    fn test_shadow_indices_match_array_slots() {
        let mut ctx = RecordingContext::new();
        let mut rig = LightRig::default();
        for index in 0..4 {
            assert_eq!(rig.next_shadow_index(), index);
            let light = directional(&mut ctx, &rig, index);
            rig.add(light).unwrap();
        }

        let mut lit = UniformTable::new();
        rig.upload(&mut ctx, &mut lit);

        assert_eq!(lit.get("numShadows"), Some(UniformValue::Int(4)));
        for (slot, light) in rig.directional_lights().iter().enumerate() {
            let index = light.shadow_index().unwrap();
            assert_eq!(index as usize, slot);
            assert_eq!(
                lit.get(&format!("dirLights[{}].shadowIndex", slot)),
                Some(UniformValue::Int(index as i32))
            );
            assert_eq!(
                lit.get(&format!("lightSpaceMatrix[{}]", index)),
                Some(UniformValue::Mat4(light.light_space_matrix().unwrap()))
            );
        }
    }

    #[test]
    fn test_duplicate_shadow_index_rejected() {
        let mut ctx = RecordingContext::new();
        let mut rig = LightRig::default();
        let first = directional(&mut ctx, &rig, 0);
        let second = directional(&mut ctx, &rig, 0);

        rig.add(first).unwrap();
        assert_eq!(
            rig.add(second),
            Err(LightError::ShadowIndexInUse { index: 0 })
        );
        assert_eq!(rig.directional_lights().len(), 1);
        // The rejected light was dropped along with its shadow map
        assert_eq!(ctx.live_targets(), 1);
    }

    #[test]
    fn test_shadow_index_beyond_capacity_rejected() {
        let mut ctx = RecordingContext::new();
        let mut rig = LightRig::default();
        let light = directional(&mut ctx, &rig, MAX_SHADOW_MAPS as u32);

        assert_eq!(
            rig.add(light),
            Err(LightError::ShadowIndexOutOfRange {
                index: MAX_SHADOW_MAPS as u32,
                capacity: MAX_SHADOW_MAPS as u32
            })
        );
    }

    #[test]
    fn test_shadow_index_gap_rejected() {
        let mut ctx = RecordingContext::new();
        let mut rig = LightRig::default();
        let light = directional(&mut ctx, &rig, 5);

        assert_eq!(
            rig.add(light),
            Err(LightError::ShadowIndexNotDense {
                index: 5,
                expected: 0
            })
        );
        assert_eq!(rig.shadow_count(), 0);
        assert!(rig.directional_lights().is_empty());

        let mut lit = UniformTable::new();
        rig.upload(&mut ctx, &mut lit);
        assert_eq!(lit.get("numShadows"), Some(UniformValue::Int(0)));
        assert!(lit.get("lightSpaceMatrix[5]").is_none());
    }

    #[test]
    fn test_each_pass_runs_its_own_callback() {
        let mut ctx = RecordingContext::new();
        let mut rig = LightRig::default();
        for index in 0..2 {
            let light = directional(&mut ctx, &rig, index);
            rig.add(light).unwrap();
        }
        let point = Light::point(
            &mut ctx,
            color(),
            ShadowParams::enabled(5, rig.next_shadow_index()),
            Attenuation::default(),
            Vector3::new(2.0, 2.0, 2.0),
            rig.settings(),
        )
        .unwrap();
        rig.add(point).unwrap();

        // 2D maps render before cube maps
        let bound = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let flat_log = bound.clone();
        let cube_log = bound.clone();
        let mut flat = UniformTable::new();
        let mut cube = UniformTable::new();
        rig.render_shadow_maps(
            &mut ctx,
            &mut flat,
            &mut cube,
            &mut || flat_log.borrow_mut().push("flat"),
            &mut || cube_log.borrow_mut().push("cube"),
        );

        assert_eq!(*bound.borrow(), vec!["flat", "flat", "cube"]);
    }

    #[test]
    fn test_unshadowed_lights_do_not_claim_indices() {
        let mut ctx = RecordingContext::new();
        let rig = demo_rig(&mut ctx);

        assert_eq!(rig.shadow_count(), 2);
        assert_eq!(rig.next_shadow_index(), 2);
        assert_eq!(rig.spot_lights()[0].shadow_index(), None);
    }

    #[test]
    fn test_render_shadow_maps_draws_shadowed_lights_only() {
        let mut ctx = RecordingContext::new();
        let rig = demo_rig(&mut ctx);
        ctx.clear_calls();

        let mut flat = UniformTable::new();
        let mut cube = UniformTable::new();
        let mut flat_draws = 0;
        let mut cube_draws = 0;
        rig.render_shadow_maps(
            &mut ctx,
            &mut flat,
            &mut cube,
            &mut || flat_draws += 1,
            &mut || cube_draws += 1,
        );

        assert_eq!((flat_draws, cube_draws), (1, 1));
        assert_eq!(flat.names().collect::<Vec<_>>(), vec!["lightSpaceMatrix"]);
        assert_eq!(cube.len(), 8);
        assert_eq!(cube.get("farPlane"), Some(UniformValue::Float(25.0)));
        assert_eq!(
            cube.get("lightPos"),
            Some(UniformValue::Vec3(Vector3::new(2.0, 2.0, 2.0)))
        );

        let point = &rig.point_lights()[0];
        let transforms = point.shadow_transforms().unwrap();
        for (face, transform) in transforms.iter().enumerate() {
            match cube.get(&format!("shadowTransforms[{}]", face)) {
                Some(UniformValue::Mat4(written)) => assert_mat_close(&written, transform),
                other => panic!("face {} missing: {:?}", face, other),
            }
        }

        let clears = ctx
            .calls()
            .iter()
            .filter(|call| **call == ContextCall::ClearDepth)
            .count();
        assert_eq!(clears, 2);
    }

    #[test]
    fn test_upload_binds_shadow_maps_and_counts() {
        let mut ctx = RecordingContext::new();
        let rig = demo_rig(&mut ctx);
        ctx.clear_calls();

        let mut lit = UniformTable::new();
        rig.upload(&mut ctx, &mut lit);

        assert_eq!(lit.get("numDirLights"), Some(UniformValue::Int(1)));
        assert_eq!(lit.get("numPointLights"), Some(UniformValue::Int(1)));
        assert_eq!(lit.get("numSpotLights"), Some(UniformValue::Int(1)));
        assert_eq!(lit.get("numShadows"), Some(UniformValue::Int(2)));
        assert_eq!(lit.get("spotLights[0].hasShadow"), Some(UniformValue::Bool(false)));
        assert_eq!(lit.get("pointLights[0].shadowMap"), Some(UniformValue::Int(3)));
        assert!(lit.get("lightSpaceMatrix[0]").is_some());
        assert!(lit.get("lightSpaceMatrix[1]").is_none());

        let binds: Vec<_> = ctx
            .calls()
            .into_iter()
            .filter(|call| matches!(call, ContextCall::BindTexture(..)))
            .collect();
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn test_shadow_matrices_block() {
        let mut ctx = RecordingContext::new();
        let rig = demo_rig(&mut ctx);
        let block = rig.shadow_matrices();

        assert_eq!(block.count, 2);
        let expected: [[f32; 4]; 4] = rig.directional_lights()[0]
            .light_space_matrix()
            .unwrap()
            .into();
        assert_eq!(block.light_space[0], expected);
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        assert_eq!(block.light_space[1], identity);
        assert_eq!(bytemuck::bytes_of(&block).len(), 16 * 4 * MAX_SHADOW_MAPS + 16);
    }
}
