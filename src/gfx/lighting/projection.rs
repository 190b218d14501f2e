//! Light-space projection math
//!
//! Directional lights project orthographically from a synthetic eye placed
//! against their direction, spot lights use a 90° perspective frustum along
//! their cone axis, and point lights render six 90° frusta, one per cube face.

use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};

/// Distance along the light direction used to place look-at targets and eyes
pub const LOOK_DISTANCE: f32 = 5.0;

/// Orthographic shadow frustum of a directional light
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrthoProjection {
    /// Half the width and height of the frustum in world units
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrthoProjection {
    fn default() -> Self {
        Self {
            half_extent: 10.0,
            near: 1.0,
            far: 7.5,
        }
    }
}

impl OrthoProjection {
    pub fn matrix(&self) -> Matrix4<f32> {
        let h = self.half_extent;
        cgmath::ortho(-h, h, -h, h, self.near, self.far)
    }
}

/// Perspective shadow frustum of a spot or point light
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PerspectiveProjection {
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveProjection {
    /// Frustum used for omnidirectional (cube map) shadows
    pub fn point() -> Self {
        Self {
            fov_y: 90.0,
            near: 1.0,
            far: 25.0,
        }
    }

    /// Frustum used for spot light shadows
    pub fn spot() -> Self {
        Self {
            fov_y: 90.0,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn with_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn matrix(&self, aspect: f32) -> Matrix4<f32> {
        cgmath::perspective(Deg(self.fov_y), aspect, self.near, self.far)
    }
}

/// Up vector for a directional light shining along `direction`
///
/// +Y, unless the light shines (anti)parallel to it, in which case +Z is
/// used so the view basis stays finite.
pub fn directional_up(direction: Vector3<f32>) -> Vector3<f32> {
    let up = Vector3::unit_y();
    if direction.cross(up).magnitude2() > 1e-6 * direction.magnitude2() {
        return up;
    }

    log::debug!(
        "Directional light {:?} is parallel to +Y, using +Z as up",
        direction
    );
    Vector3::unit_z()
}

/// Directional light view: looks from `-direction * 5` at the origin
///
/// `direction` must be non-zero; light constructors reject a zero direction.
pub fn directional_view(direction: Vector3<f32>) -> Matrix4<f32> {
    let eye = Point3::from_vec(-direction * LOOK_DISTANCE);
    Matrix4::look_at_rh(eye, Point3::origin(), directional_up(direction))
}

pub fn directional_light_space(
    direction: Vector3<f32>,
    projection: &OrthoProjection,
) -> Matrix4<f32> {
    projection.matrix() * directional_view(direction)
}

/// Up vector for a spot light looking along `direction`
///
/// The rotated vector `(-d.y, d.x, d.z)` is used whenever it is not parallel
/// to `direction`. It degenerates for directions along the Z axis (and for a
/// zero direction), in which case a world axis is substituted.
pub fn spot_up(direction: Vector3<f32>) -> Vector3<f32> {
    let up = Vector3::new(-direction.y, direction.x, direction.z);
    let scale = direction.magnitude2() * up.magnitude2();
    if direction.cross(up).magnitude2() > 1e-6 * scale && scale > 0.0 {
        return up;
    }

    log::debug!(
        "Spot light direction {:?} has a degenerate up vector, falling back to a world axis",
        direction
    );
    if direction.y.abs() > direction.x.abs().max(direction.z.abs()) {
        Vector3::unit_z()
    } else {
        Vector3::unit_y()
    }
}

/// Spot light view: looks from `position` along `direction`
///
/// `direction` must be non-zero, otherwise eye and target coincide.
pub fn spot_view(position: Vector3<f32>, direction: Vector3<f32>) -> Matrix4<f32> {
    let eye = Point3::from_vec(position);
    Matrix4::look_at_rh(eye, eye + direction * LOOK_DISTANCE, spot_up(direction))
}

pub fn spot_light_space(
    position: Vector3<f32>,
    direction: Vector3<f32>,
    projection: &PerspectiveProjection,
) -> Matrix4<f32> {
    projection.matrix(1.0) * spot_view(position, direction)
}

/// Faces of a cube-map depth target in layer order
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    /// Layer order expected by cube-map rendering: +X, -X, +Y, -Y, +Z, -Z
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn direction(self) -> Vector3<f32> {
        match self {
            CubeFace::PositiveX => Vector3::new(1.0, 0.0, 0.0),
            CubeFace::NegativeX => Vector3::new(-1.0, 0.0, 0.0),
            CubeFace::PositiveY => Vector3::new(0.0, 1.0, 0.0),
            CubeFace::NegativeY => Vector3::new(0.0, -1.0, 0.0),
            CubeFace::PositiveZ => Vector3::new(0.0, 0.0, 1.0),
            CubeFace::NegativeZ => Vector3::new(0.0, 0.0, -1.0),
        }
    }

    /// Up vector of the face in cube-map convention
    pub fn up(self) -> Vector3<f32> {
        match self {
            CubeFace::PositiveY => Vector3::new(0.0, 0.0, 1.0),
            CubeFace::NegativeY => Vector3::new(0.0, 0.0, -1.0),
            _ => Vector3::new(0.0, -1.0, 0.0),
        }
    }

    pub fn view(self, position: Vector3<f32>) -> Matrix4<f32> {
        let eye = Point3::from_vec(position);
        Matrix4::look_at_rh(eye, eye + self.direction(), self.up())
    }
}

/// Projection × view for all six faces around `position`
pub fn cube_face_transforms(
    position: Vector3<f32>,
    projection: &PerspectiveProjection,
    aspect: f32,
) -> [Matrix4<f32>; 6] {
    let proj = projection.matrix(aspect);
    CubeFace::ALL.map(|face| proj * face.view(position))
}
