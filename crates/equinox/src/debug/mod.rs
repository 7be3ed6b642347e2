//! Debug drawing for scene overlays

pub mod draw;

pub use draw::{DebugDraw, DebugDrawSystem, DebugShape, BOUNDS_COLOR, COLLIDER_COLOR, HIERARCHY_COLOR};
