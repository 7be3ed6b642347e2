//! # Equinox
//!
//! Scene-graph core of the Equinox editor: nodes owning components, a
//! per-frame play/edit state machine, and a rigid-body bridge to a physics
//! world.
//!
//! ## Features
//!
//! - **Scene graph**: arena-owned nodes with ordered children and components
//! - **Play mode**: begin/update/end hooks with edit state restored on stop
//! - **Physics bridge**: rigid-body components synchronised with a pluggable world
//! - **Debug draw**: hierarchy, bounding box and collider overlays
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use equinox::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let ball = engine.scene.create_node("ball");
//!         engine.scene.add_component(ball, TransformComponent::identity(), engine.physics.as_mut())?;
//!         engine.editor.play();
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         if engine.frame_count() > 120 {
//!             engine.quit();
//!         }
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = MyApp;
//!     Engine::run(Settings::default(), &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod settings;
pub mod scene;
pub mod physics;
pub mod debug;

mod application;
mod engine;

#[cfg(test)]
mod testing;

pub use application::{Application, AppError};
pub use engine::{DebugOverlays, Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineError, DebugOverlays,
        config::{Config, ConfigError},
        settings::Settings,
        foundation::math::{Vec3, Mat4, Quat, Pose, Transform, Aabb},
        scene::{
            SceneGraph, NodeId, ComponentId, Node,
            Component, ComponentBase, ComponentContext, ComponentKind,
            TransformComponent, RigidBodyComponent, ColliderShape,
            EditorState, FrameContext, PlayState, SceneError,
        },
        physics::{PhysicsWorld, PhysicsBody, BasicPhysicsWorld, CollisionFlags},
        debug::{DebugDraw, DebugDrawSystem},
    };
}
