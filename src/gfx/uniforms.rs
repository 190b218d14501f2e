//! Shader uniform marshaling
//!
//! Lights serialize themselves into a [`UniformSink`] under GLSL-style names
//! such as `dirLights[0].ambient`. The sink is whatever the renderer uses to
//! feed its shader programs; [`UniformTable`] is an in-memory implementation
//! that keeps every write in order.

use cgmath::{Matrix4, Vector3};

/// Destination for named shader uniform values
pub trait UniformSink {
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>);
}

/// A single uniform value
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec3(Vector3<f32>),
    Mat4(Matrix4<f32>),
}

/// Formats `array[index]`
pub fn element_name(array: &str, index: usize) -> String {
    format!("{}[{}]", array, index)
}

/// Formats `name.field`
pub fn member_name(name: &str, field: &str) -> String {
    format!("{}.{}", name, field)
}

/// Ordered record of uniform writes
///
/// Later writes to the same name do not replace earlier ones in the write
/// log, but [`get`](UniformTable::get) always returns the most recent value.
#[derive(Clone, Debug, Default)]
pub struct UniformTable {
    writes: Vec<(String, UniformValue)>,
}

impl UniformTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value written under `name`
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.writes
            .iter()
            .rev()
            .find(|(written, _)| written == name)
            .map(|(_, value)| *value)
    }

    /// Names in the order they were written
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.writes.iter().map(|(name, _)| name.as_str())
    }

    /// All writes in order
    pub fn writes(&self) -> &[(String, UniformValue)] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }

    fn push(&mut self, name: &str, value: UniformValue) {
        self.writes.push((name.to_owned(), value));
    }
}

impl UniformSink for UniformTable {
    fn set_bool(&mut self, name: &str, value: bool) {
        self.push(name, UniformValue::Bool(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.push(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.push(name, UniformValue::Float(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.push(name, UniformValue::Vec3(value));
    }

    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>) {
        self.push(name, UniformValue::Mat4(*value));
    }
}
