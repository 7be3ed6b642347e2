//! Transform component
//!
//! Holds the node's local transform as a 4x4 matrix. This is the only channel
//! through which position and rotation flow between the scene and physics.

use std::any::Any;

use crate::foundation::math::{Mat4, Mat4Ext, Quat, Transform, Vec3};
use crate::scene::component::{Component, ComponentBase, ComponentKind};

/// Local transform of a node
#[derive(Debug, Clone)]
pub struct TransformComponent {
    base: ComponentBase,
    matrix: Mat4,
    backup: Option<Mat4>,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::from_matrix(Mat4::identity())
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from a local matrix
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self {
            base: ComponentBase::new(ComponentKind::Transform),
            matrix,
            backup: None,
        }
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self::from_matrix(Mat4::new_translation(&position))
    }

    /// Create from position, rotation and scale
    pub fn from_transform(transform: &Transform) -> Self {
        Self::from_matrix(transform.to_matrix())
    }

    /// Local matrix
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Replace the local matrix
    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;
    }

    /// Decompose into position, rotation and scale
    pub fn to_transform(&self) -> Transform {
        Transform::from_matrix(&self.matrix)
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.matrix.translation_part()
    }

    /// Move the node, keeping rotation and scale
    pub fn set_position(&mut self, position: Vec3) {
        self.matrix.m14 = position.x;
        self.matrix.m24 = position.y;
        self.matrix.m34 = position.z;
    }

    /// Local rotation (scale removed)
    pub fn rotation(&self) -> Quat {
        self.matrix.rotation_part()
    }

    /// Rotate the node, keeping position and scale
    pub fn set_rotation(&mut self, rotation: Quat) {
        let mut transform = self.to_transform();
        transform.rotation = rotation;
        self.matrix = transform.to_matrix();
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Builder pattern: Set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Whether an edit-time matrix is saved for the current play session
    pub fn has_snapshot(&self) -> bool {
        self.backup.is_some()
    }
}

impl Component for TransformComponent {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot_state(&mut self) {
        self.backup = Some(self.matrix);
    }

    fn restore_state(&mut self) {
        if let Some(matrix) = self.backup.take() {
            self.matrix = matrix;
        }
    }
}
