//! Concrete components shipped with the scene graph

pub mod transform;
pub mod rigid_body;

pub use transform::TransformComponent;
pub use rigid_body::{ColliderShape, RigidBodyComponent};
