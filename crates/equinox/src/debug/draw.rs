//! Debug drawing primitives and system
//!
//! Scene overlays (hierarchy lines, bounding boxes, colliders) are emitted
//! through the [`DebugDraw`] trait. [`DebugDrawSystem`] is the stock sink:
//! it collects shapes for the frame so a renderer, or a test, can consume
//! them.

use crate::foundation::math::{Aabb, Quat, Vec3, Vec4};

/// Blue, parent-to-child hierarchy lines
pub const HIERARCHY_COLOR: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

/// White, node bounding boxes
pub const BOUNDS_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

/// Green, physics colliders
pub const COLLIDER_COLOR: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);

/// Sink for debug geometry
pub trait DebugDraw {
    /// Line segment from start to end
    fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4);

    /// Oriented box at center with half extents
    fn draw_box(&mut self, center: Vec3, half_extents: Vec3, rotation: Quat, color: Vec4);

    /// Sphere at center
    fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Vec4);

    /// Capsule between the two cap centers
    fn draw_capsule(&mut self, start: Vec3, end: Vec3, radius: f32, color: Vec4);

    /// Axis-aligned box, ignored when empty
    fn draw_aabb(&mut self, aabb: &Aabb, color: Vec4) {
        if aabb.is_empty() {
            return;
        }
        self.draw_box(aabb.center(), aabb.half_size(), Quat::identity(), color);
    }
}

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        start: Vec3,
        end: Vec3,
        color: Vec4,
        duration: f32,
    },

    /// Box at center with half-extents
    Box {
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        color: Vec4,
        duration: f32,
    },

    /// Sphere at center with radius
    Sphere {
        center: Vec3,
        radius: f32,
        color: Vec4,
        duration: f32,
    },

    /// Capsule from start to end with radius
    Capsule {
        start: Vec3,
        end: Vec3,
        radius: f32,
        color: Vec4,
        duration: f32,
    },
}

impl DebugShape {
    fn duration_mut(&mut self) -> &mut f32 {
        match self {
            DebugShape::Line { duration, .. }
            | DebugShape::Box { duration, .. }
            | DebugShape::Sphere { duration, .. }
            | DebugShape::Capsule { duration, .. } => duration,
        }
    }

    /// Remaining lifetime in seconds
    pub fn duration(&self) -> f32 {
        match self {
            DebugShape::Line { duration, .. }
            | DebugShape::Box { duration, .. }
            | DebugShape::Sphere { duration, .. }
            | DebugShape::Capsule { duration, .. } => *duration,
        }
    }

    /// Color of the shape
    pub fn color(&self) -> Vec4 {
        match self {
            DebugShape::Line { color, .. }
            | DebugShape::Box { color, .. }
            | DebugShape::Sphere { color, .. }
            | DebugShape::Capsule { color, .. } => *color,
        }
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        let duration = self.duration_mut();
        *duration -= delta_time;
        *duration <= 0.0
    }
}

/// Collects debug shapes between frames
///
/// Shapes live for `shape_duration` seconds; the default of zero keeps a
/// shape until the next [`update`](Self::update), i.e. for a single frame.
#[derive(Debug)]
pub struct DebugDrawSystem {
    shapes: Vec<DebugShape>,
    shape_duration: f32,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system with single-frame shapes
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            shape_duration: 0.0,
            enabled: true,
        }
    }

    /// Keep shapes for `duration` seconds
    pub fn with_shape_duration(mut self, duration: f32) -> Self {
        self.shape_duration = duration;
        self
    }

    fn push(&mut self, shape: DebugShape) {
        if self.enabled {
            self.shapes.push(shape);
        }
    }

    /// Update shape lifetimes and remove expired shapes
    pub fn update(&mut self, delta_time: f32) {
        self.shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Shapes drawn so far
    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Clear all shapes
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugDraw for DebugDrawSystem {
    fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4) {
        self.push(DebugShape::Line {
            start,
            end,
            color,
            duration: self.shape_duration,
        });
    }

    fn draw_box(&mut self, center: Vec3, half_extents: Vec3, rotation: Quat, color: Vec4) {
        self.push(DebugShape::Box {
            center,
            half_extents,
            rotation,
            color,
            duration: self.shape_duration,
        });
    }

    fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Vec4) {
        self.push(DebugShape::Sphere {
            center,
            radius,
            color,
            duration: self.shape_duration,
        });
    }

    fn draw_capsule(&mut self, start: Vec3, end: Vec3, radius: f32, color: Vec4) {
        self.push(DebugShape::Capsule {
            start,
            end,
            radius,
            color,
            duration: self.shape_duration,
        });
    }
}
