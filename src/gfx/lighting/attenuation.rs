use crate::gfx::uniforms::{member_name, UniformSink};

/// Distance falloff `1 / (constant + linear·d + quadratic·d²)`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// Coefficients that fade a light out over roughly `range` world units
    pub fn for_range(range: f32) -> Self {
        Self {
            constant: 1.0,
            linear: 4.5 / range,
            quadratic: 75.0 / (range * range),
        }
    }

    /// Intensity multiplier at `distance` from the light
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }

    /// Writes `name.constant`, `name.linear` and `name.quadratic`
    pub fn write_uniforms(&self, sink: &mut dyn UniformSink, name: &str) {
        sink.set_float(&member_name(name, "constant"), self.constant);
        sink.set_float(&member_name(name, "linear"), self.linear);
        sink.set_float(&member_name(name, "quadratic"), self.quadratic);
    }
}

impl Default for Attenuation {
    /// Coefficients for a range of about 50 units
    fn default() -> Self {
        Self::new(1.0, 0.09, 0.032)
    }
}
