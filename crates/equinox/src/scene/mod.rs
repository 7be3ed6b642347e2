//! Scene graph: nodes, components and the per-frame update state machine
//!
//! ## Architecture
//!
//! ```text
//! Engine frame
//!      ↓
//! SceneGraph::update(FrameContext)      roots in order, depth first
//!      ↓
//! Node components (hooks per UpdateMode)
//!      ↓
//! PhysicsWorld::step(dt, &mut SceneGraph)  pull/push through MotionSync
//! ```
//!
//! Nodes live in a [`SceneGraph`] arena and refer to each other by
//! [`NodeId`]. Each node owns an ordered list of boxed [`Component`]s and at
//! most one [`TransformComponent`], which is the only channel through which
//! position and rotation flow between the scene and physics.

mod component;
pub mod components;
mod error;
mod graph;
mod node;
mod state;

#[cfg(test)]
mod tests;

pub use component::{Component, ComponentBase, ComponentContext, ComponentKind};
pub use components::{ColliderShape, RigidBodyComponent, TransformComponent};
pub use error::{SceneError, SceneResult};
pub use graph::SceneGraph;
pub use node::{ComponentId, Node, NodeId};
pub use state::{EditorState, FrameContext, PlayState, UpdateMode};
