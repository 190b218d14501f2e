use cgmath::Vector3;

use crate::gfx::uniforms::{element_name, member_name, UniformSink};

/// Phong color terms shared by every light kind
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightColor {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl LightColor {
    pub fn new(ambient: Vector3<f32>, diffuse: Vector3<f32>, specular: Vector3<f32>) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
        }
    }

    /// Writes `name.ambient`, `name.diffuse` and `name.specular`
    pub fn write_uniforms(&self, sink: &mut dyn UniformSink, name: &str) {
        sink.set_vec3(&member_name(name, "ambient"), self.ambient);
        sink.set_vec3(&member_name(name, "diffuse"), self.diffuse);
        sink.set_vec3(&member_name(name, "specular"), self.specular);
    }

    /// Writes the terms of element `index` of the uniform array `array`
    pub fn write_uniforms_at(&self, sink: &mut dyn UniformSink, array: &str, index: usize) {
        self.write_uniforms(sink, &element_name(array, index));
    }
}
