//! Math utilities and types
//!
//! Provides the math types shared by the scene graph and the physics bridge.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
    Isometry3,
    Rotation3,
    Translation3,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (also used for RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Rigid pose (rotation + translation) exchanged with the physics world
pub type Pose = Isometry3<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Create a transform from a transformation matrix
    ///
    /// Assumes an affine TRS matrix. An axis with zero scale keeps a zero
    /// scale and does not contribute to the rotation.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let position = Vec3::new(matrix.m14, matrix.m24, matrix.m34);

        let scale_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude();
        let scale_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude();
        let scale_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude();
        let scale = Vec3::new(scale_x, scale_y, scale_z);

        let (sx, sy, sz) = (divisor(scale_x), divisor(scale_y), divisor(scale_z));
        let rotation_matrix = Matrix3::new(
            matrix.m11 / sx, matrix.m12 / sy, matrix.m13 / sz,
            matrix.m21 / sx, matrix.m22 / sy, matrix.m23 / sz,
            matrix.m31 / sx, matrix.m32 / sy, matrix.m33 / sz,
        );

        Self {
            position,
            rotation: rotation_from_matrix(&rotation_matrix),
            scale,
        }
    }

    /// Rigid part of this transform (scale dropped)
    pub fn to_pose(&self) -> Pose {
        Pose::from_parts(Translation3::from(self.position), self.rotation)
    }

    /// Combine this transform with another (`self` applied after `other`)
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            position: self.position + self.rotation * (self.scale.component_mul(&other.position)),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }

    /// Get the inverse transform
    pub fn inverse(&self) -> Self {
        let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
        let inv_rotation = self.rotation.inverse();
        let inv_position = inv_rotation * (-self.position.component_mul(&inv_scale));

        Self {
            position: inv_position,
            rotation: inv_rotation,
            scale: inv_scale,
        }
    }
}

/// Upper bound on the orthonormalisation steps of a rotation extraction
const ROTATION_MAX_ITERATIONS: usize = 64;

fn divisor(scale: f32) -> f32 {
    if scale > f32::EPSILON {
        scale
    } else {
        1.0
    }
}

/// Closest rotation to `matrix`, identity when it carries no usable rotation
fn rotation_from_matrix(matrix: &Mat3) -> Quat {
    if !matrix.iter().all(|value| value.is_finite()) {
        return Quat::identity();
    }
    let rotation = Rotation3::from_matrix_eps(
        matrix,
        f32::EPSILON,
        ROTATION_MAX_ITERATIONS,
        Rotation3::identity(),
    );
    Quat::from_rotation_matrix(&rotation)
}

/// Axis-aligned bounding box
///
/// A fresh box is "negative infinite" (min = +inf, max = -inf) so that the
/// first enclosed point defines it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Empty box that encloses nothing
    pub fn negative_infinity() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Create an AABB centered at a point with given half-size
    pub fn from_center_half_size(center: Vec3, half_size: Vec3) -> Self {
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// True until at least one point has been enclosed
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-size (extents) of the AABB
    pub fn half_size(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grow the box so it contains `point`
    pub fn enclose_point(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Grow the box so it contains `other`
    pub fn enclose(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.enclose_point(other.min);
        self.enclose_point(other.max);
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::negative_infinity()
    }
}

/// Extension trait for Mat4 with rigid-transform helpers
pub trait Mat4Ext {
    /// Translation column of the matrix
    fn translation_part(&self) -> Vec3;

    /// Rotation of the matrix with scale removed
    fn rotation_part(&self) -> Quat;

    /// Build a rigid matrix from a rotation and translation
    fn from_rotation_translation(rotation: &Quat, translation: &Vec3) -> Mat4;

    /// Origin of the frame described by this matrix
    fn origin(&self) -> Vec3 {
        self.translation_part()
    }
}

impl Mat4Ext for Mat4 {
    fn translation_part(&self) -> Vec3 {
        Vec3::new(self.m14, self.m24, self.m34)
    }

    fn rotation_part(&self) -> Quat {
        Transform::from_matrix(self).rotation
    }

    fn from_rotation_translation(rotation: &Quat, translation: &Vec3) -> Mat4 {
        Mat4::new_translation(translation) * rotation.to_homogeneous()
    }
}
