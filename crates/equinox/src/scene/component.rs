//! Component trait and lifecycle hooks
//!
//! A component is a unit of behaviour owned by exactly one node. The scene
//! graph drives it through these lifecycle states:
//!
//! ```text
//! attached -> begin_play -> update* -> end_play -> ... -> clean_up
//!          \-> editor_update* (while not playing)
//! ```
//!
//! Disabled components receive none of the per-frame or play hooks.

use std::any::Any;

use super::node::{ComponentId, Node, NodeId};
use crate::debug::DebugDraw;
use crate::foundation::math::Mat4;
use crate::physics::PhysicsWorld;

/// Closed set of component kinds known to the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Local position/rotation/scale of a node
    Transform,
    /// Bridge to a physics body
    RigidBody,
    /// Any other behaviour, identified by name
    Custom(&'static str),
}

impl ComponentKind {
    /// Symbolic name used for name-based lookups
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Transform => "Transform",
            Self::RigidBody => "RigidBody",
            Self::Custom(name) => *name,
        }
    }
}

/// State shared by every component
#[derive(Debug, Clone)]
pub struct ComponentBase {
    kind: ComponentKind,
    enabled: bool,
    owner: Option<NodeId>,
}

impl ComponentBase {
    /// Enabled, unattached component state of the given kind
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            enabled: true,
            owner: None,
        }
    }

    /// Component kind
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Whether lifecycle hooks are delivered
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable lifecycle hooks
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Owning node, set while the component is attached
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<NodeId>) {
        self.owner = owner;
    }
}

/// Everything a lifecycle hook may touch besides the component itself
///
/// While a hook runs, its own component is temporarily out of the node's
/// component list; every other component of the node stays reachable.
pub struct ComponentContext<'a> {
    /// Owning node id
    pub node_id: NodeId,
    /// Id of the component receiving the hook
    pub component_id: ComponentId,
    /// Owning node
    pub node: &'a mut Node,
    /// Physics collaborator
    pub physics: &'a mut dyn PhysicsWorld,
    parent_world: Mat4,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(
        node_id: NodeId,
        component_id: ComponentId,
        node: &'a mut Node,
        parent_world: Mat4,
        physics: &'a mut dyn PhysicsWorld,
    ) -> Self {
        Self {
            node_id,
            component_id,
            node,
            physics,
            parent_world,
        }
    }

    /// Accumulated transform of the owning node's parent
    pub fn parent_world_matrix(&self) -> &Mat4 {
        &self.parent_world
    }

    /// World transform of the owning node
    pub fn world_matrix(&self) -> Mat4 {
        self.parent_world * self.node.local_matrix()
    }
}

/// Polymorphic unit of behaviour attached to a node
///
/// Every hook has an empty default, so a component only implements the
/// ones it cares about.
pub trait Component: Any {
    /// Shared component state
    fn base(&self) -> &ComponentBase;

    /// Shared component state, mutably
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Upcast for typed lookups
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed lookups, mutably
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Component kind
    fn kind(&self) -> ComponentKind {
        self.base().kind()
    }

    /// Symbolic name of the component kind
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Whether lifecycle hooks are delivered
    fn is_enabled(&self) -> bool {
        self.base().is_enabled()
    }

    /// Enable or disable lifecycle hooks
    fn set_enabled(&mut self, enabled: bool) {
        self.base_mut().set_enabled(enabled);
    }

    /// Called once when the component joins a node
    fn attached(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Called on the first frame of play mode
    fn begin_play(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Called every frame while playing
    fn update(&mut self, _ctx: &mut ComponentContext<'_>, _delta_time: f32) {}

    /// Called every frame while editing; `delta_time` is zero when paused
    fn editor_update(&mut self, _ctx: &mut ComponentContext<'_>, _delta_time: f32) {}

    /// Called on the first frame after play mode ends
    fn end_play(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Called once before the component is released
    fn clean_up(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Save edit-time state right before `begin_play`
    fn snapshot_state(&mut self) {}

    /// Restore the state saved by `snapshot_state` right after `end_play`
    fn restore_state(&mut self) {}

    /// Emit debug geometry, `world` being the owning node's world transform
    fn debug_draw(&self, _world: &Mat4, _draw: &mut dyn DebugDraw) {}
}
