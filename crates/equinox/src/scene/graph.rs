//! Scene graph arena
//!
//! Owns every node of the scene. Parent/child links and component owners are
//! [`NodeId`] keys into the arena, so deleting a node can never leave a
//! dangling reference behind: stale ids simply resolve to nothing.
//!
//! Per-frame traversal is depth first: a node runs its own component batch,
//! advances its cached play flag, then recurses into its children in order.

use slotmap::SlotMap;

use super::component::{Component, ComponentContext, ComponentKind};
use super::components::{RigidBodyComponent, TransformComponent};
use super::error::{SceneError, SceneResult};
use super::node::{ComponentId, ComponentSlot, Node, NodeId};
use super::state::{FrameContext, UpdateMode};
use crate::debug::{DebugDraw, BOUNDS_COLOR, HIERARCHY_COLOR};
use crate::foundation::math::{Mat4, Mat4Ext, Pose};
use crate::physics::{BodyHandle, BodyOwner, MotionSync, PhysicsWorld};

/// Arena of nodes plus the ordered list of roots
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_component_id: u32,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    // --- Nodes ------------------------------------------------------------

    /// Create a new root node
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.nodes.insert(Node::new(name));
        self.roots.push(id);
        log::debug!("Created node {:?}", id);
        id
    }

    /// Create a node directly under `parent`
    pub fn create_child(&mut self, parent: NodeId, name: impl Into<String>) -> SceneResult<NodeId> {
        self.ensure(parent)?;
        let id = self.create_node(name);
        self.set_parent(id, parent)?;
        Ok(id)
    }

    /// Node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Node by id, mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root nodes in creation order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Every live node id, in arena order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }

    /// First node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name() == name)
            .map(|(id, _)| id)
    }

    /// Parent of `id`
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent()
    }

    /// Children of `id` in insertion order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(Node::children).unwrap_or_default()
    }

    /// Whether `ancestor` is found walking up from `id` (excluding `id` itself)
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Accumulated transform from the root down to `id`
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut world = Mat4::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(node_id) else {
                break;
            };
            world = node.local_matrix() * world;
            current = node.parent;
        }
        world
    }

    /// World transform of the parent of `id`, identity for roots
    pub fn parent_world_matrix(&self, id: NodeId) -> Mat4 {
        self.parent(id)
            .map_or_else(Mat4::identity, |parent| self.world_matrix(parent))
    }

    fn ensure(&self, id: NodeId) -> SceneResult<()> {
        if self.nodes.contains_key(id) {
            Ok(())
        } else {
            Err(SceneError::NodeNotFound(id))
        }
    }

    // --- Hierarchy --------------------------------------------------------

    /// Move `child` under `parent`, appending it to the parent's children
    ///
    /// Fails when either id is stale, or when `parent` is `child` itself or
    /// one of its descendants.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> SceneResult<()> {
        self.ensure(child)?;
        self.ensure(parent)?;
        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::CyclicHierarchy { child, parent });
        }

        self.unlink(child);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }

        log::debug!("Parented {:?} under {:?}", child, parent);
        Ok(())
    }

    /// Same as `set_parent(child, parent)`
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.set_parent(child, parent)
    }

    /// Detach `child` from `parent`, turning it into a root
    ///
    /// Returns false, and changes nothing, when `child` is not a child of
    /// `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.unlink(child);
        self.roots.push(child);
        log::debug!("Removed {:?} from {:?}", child, parent);
        true
    }

    /// Turn `child` into a root node
    pub fn detach(&mut self, child: NodeId) -> SceneResult<()> {
        self.ensure(child)?;
        if let Some(parent) = self.parent(child) {
            self.remove_child(parent, child);
        }
        Ok(())
    }

    /// Remove `child` from its parent's children (or the roots) and clear its
    /// parent link
    fn unlink(&mut self, child: NodeId) {
        match self.parent(child) {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.children.retain(|&id| id != child);
                }
            }
            None => self.roots.retain(|&id| id != child),
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
    }

    // --- Components -------------------------------------------------------

    /// Attach a component to `node` and run its `attached` hook
    pub fn add_component<C: Component>(
        &mut self,
        node: NodeId,
        component: C,
        physics: &mut dyn PhysicsWorld,
    ) -> SceneResult<ComponentId> {
        self.add_boxed_component(node, Box::new(component), physics)
    }

    /// Attach an already boxed component to `node`
    ///
    /// A second transform component is rejected; any other kind may be added
    /// several times, name lookups then return the first one.
    pub fn add_boxed_component(
        &mut self,
        node_id: NodeId,
        mut component: Box<dyn Component>,
        physics: &mut dyn PhysicsWorld,
    ) -> SceneResult<ComponentId> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(SceneError::NodeNotFound(node_id))?;

        let is_transform = component.kind() == ComponentKind::Transform;
        if is_transform && node.transform.is_some() {
            return Err(SceneError::DuplicateTransform(node_id));
        }

        let next = self
            .next_component_id
            .checked_add(1)
            .ok_or(SceneError::ComponentIdsExhausted)?;
        let id = ComponentId::new(self.next_component_id);
        self.next_component_id = next;

        let name = component.name();
        component.base_mut().set_owner(Some(node_id));
        let index = node.components.len();
        node.components.push(ComponentSlot {
            id,
            component: Some(component),
        });
        if is_transform {
            node.transform = Some(id);
        }
        log::debug!("Added {} component {} to node '{}'", name, id, node.name());

        let parent_world = self.parent_world_matrix(node_id);
        self.with_component(node_id, index, parent_world, physics, |component, ctx| {
            component.attached(ctx);
        });
        Ok(id)
    }

    /// First component of `node` whose symbolic name matches
    pub fn component_by_name(&self, node: NodeId, name: &str) -> Option<&dyn Component> {
        self.nodes.get(node)?.component_by_name(name)
    }

    /// First component of `node` of the given kind
    pub fn component_by_kind(&self, node: NodeId, kind: ComponentKind) -> Option<&dyn Component> {
        self.nodes.get(node)?.component_by_kind(kind)
    }

    /// First component of `node` of concrete type `T`
    pub fn component<T: Component>(&self, node: NodeId) -> Option<&T> {
        self.nodes.get(node)?.component::<T>()
    }

    /// First component of `node` of concrete type `T`, mutably
    pub fn component_mut<T: Component>(&mut self, node: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(node)?.component_mut::<T>()
    }

    /// Transform component of `node`
    pub fn transform(&self, node: NodeId) -> Option<&TransformComponent> {
        self.nodes.get(node)?.transform()
    }

    /// Transform component of `node`, mutably
    pub fn transform_mut(&mut self, node: NodeId) -> Option<&mut TransformComponent> {
        self.nodes.get_mut(node)?.transform_mut()
    }

    /// Remove the first component named `name` from `node`
    ///
    /// The component is taken out of the node before its `clean_up` hook runs.
    /// Returns false when nothing matched.
    pub fn delete_component_by_name(
        &mut self,
        node: NodeId,
        name: &str,
        physics: &mut dyn PhysicsWorld,
    ) -> bool {
        let index = self.nodes.get(node).and_then(|node| {
            node.components.iter().position(|slot| {
                slot.component
                    .as_deref()
                    .map_or(false, |component| component.name() == name)
            })
        });

        match index {
            Some(index) => {
                self.remove_component_at(node, index, physics);
                true
            }
            None => false,
        }
    }

    /// Remove the component with the given id from `node`
    pub fn delete_component(
        &mut self,
        node: NodeId,
        id: ComponentId,
        physics: &mut dyn PhysicsWorld,
    ) -> bool {
        let index = self
            .nodes
            .get(node)
            .and_then(|node| node.components.iter().position(|slot| slot.id == id));

        match index {
            Some(index) => {
                self.remove_component_at(node, index, physics);
                true
            }
            None => false,
        }
    }

    fn remove_component_at(&mut self, node_id: NodeId, index: usize, physics: &mut dyn PhysicsWorld) {
        let parent_world = self.parent_world_matrix(node_id);
        let Some(node) = self.nodes.get_mut(node_id) else {
            return;
        };
        if index >= node.components.len() {
            return;
        }

        let slot = node.components.remove(index);
        if node.transform == Some(slot.id) {
            node.transform = None;
        }
        let Some(mut component) = slot.component else {
            return;
        };

        let mut ctx = ComponentContext::new(node_id, slot.id, node, parent_world, physics);
        component.clean_up(&mut ctx);
        component.base_mut().set_owner(None);
        log::debug!("Deleted {} component {} from {:?}", component.name(), slot.id, node_id);
    }

    /// Clean up and release every component of `node`
    ///
    /// Safe to call more than once; the second call finds nothing to release.
    pub fn clean_up(&mut self, node_id: NodeId, physics: &mut dyn PhysicsWorld) {
        let parent_world = self.parent_world_matrix(node_id);
        let Some(node) = self.nodes.get_mut(node_id) else {
            return;
        };

        let slots = std::mem::take(&mut node.components);
        node.transform = None;
        for slot in slots {
            let Some(mut component) = slot.component else {
                continue;
            };
            let mut ctx = ComponentContext::new(node_id, slot.id, node, parent_world, physics);
            component.clean_up(&mut ctx);
            component.base_mut().set_owner(None);
        }
    }

    /// Clean up and release `node` and its whole subtree, children first
    pub fn destroy_node(&mut self, id: NodeId, physics: &mut dyn PhysicsWorld) -> SceneResult<()> {
        self.ensure(id)?;

        let children = self.children(id).to_vec();
        for child in children {
            self.destroy_node(child, physics)?;
        }

        self.clean_up(id, physics);
        self.unlink(id);
        self.nodes.remove(id);
        log::debug!("Destroyed node {:?}", id);
        Ok(())
    }

    /// Run `f` on the component at `index` with a context for its node
    ///
    /// The component is out of the node while `f` runs and is put back
    /// afterwards.
    fn with_component<R>(
        &mut self,
        node_id: NodeId,
        index: usize,
        parent_world: Mat4,
        physics: &mut dyn PhysicsWorld,
        f: impl FnOnce(&mut dyn Component, &mut ComponentContext<'_>) -> R,
    ) -> Option<R> {
        let node = self.nodes.get_mut(node_id)?;
        let slot = node.components.get_mut(index)?;
        let component_id = slot.id;
        let mut component = slot.component.take()?;

        let result = {
            let mut ctx = ComponentContext::new(node_id, component_id, node, parent_world, physics);
            f(component.as_mut(), &mut ctx)
        };

        if let Some(slot) = node.components.get_mut(index) {
            slot.component = Some(component);
        }
        Some(result)
    }

    // --- Frame update -----------------------------------------------------

    /// Update every root subtree in order
    pub fn update(&mut self, frame: FrameContext, physics: &mut dyn PhysicsWorld) {
        let roots = self.roots.clone();
        for root in roots {
            self.update_subtree(root, Mat4::identity(), frame, physics);
        }
    }

    /// Update a single subtree
    pub fn update_node(
        &mut self,
        id: NodeId,
        frame: FrameContext,
        physics: &mut dyn PhysicsWorld,
    ) -> SceneResult<()> {
        self.ensure(id)?;
        let parent_world = self.parent_world_matrix(id);
        self.update_subtree(id, parent_world, frame, physics);
        Ok(())
    }

    fn update_subtree(
        &mut self,
        id: NodeId,
        parent_world: Mat4,
        frame: FrameContext,
        physics: &mut dyn PhysicsWorld,
    ) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let mode = UpdateMode::resolve(node.is_playing, frame.play);
        let count = node.components.len();
        log::trace!("Updating node '{}' in {:?}", node.name(), mode);

        for index in 0..count {
            self.with_component(id, index, parent_world, physics, |component, ctx| {
                if !component.is_enabled() {
                    return;
                }
                match mode {
                    UpdateMode::EditorEditing => component.editor_update(ctx, frame.delta_time),
                    UpdateMode::EditorPaused => component.editor_update(ctx, 0.0),
                    UpdateMode::PlayToRun => {
                        component.snapshot_state();
                        component.begin_play(ctx);
                    }
                    UpdateMode::PlayRunning => component.update(ctx, frame.delta_time),
                    UpdateMode::PlayToStop => {
                        component.end_play(ctx);
                        component.restore_state();
                    }
                }
            });
        }

        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.is_playing = frame.play.playing;
        let world = parent_world * node.local_matrix();
        let children = node.children.clone();

        for child in children {
            self.update_subtree(child, world, frame, physics);
        }
    }

    // --- Physics ----------------------------------------------------------

    /// Recreate the physics body of the first rigid body on `node`
    ///
    /// Used by the editor after changing shape or size at edit time.
    pub fn commit_rigid_body(&mut self, node: NodeId, physics: &mut dyn PhysicsWorld) -> Option<BodyHandle> {
        let index = self.nodes.get(node)?.components.iter().position(|slot| {
            slot.component
                .as_deref()
                .map_or(false, |component| component.kind() == ComponentKind::RigidBody)
        })?;

        let parent_world = self.parent_world_matrix(node);
        self.with_component(node, index, parent_world, physics, |component, ctx| {
            component
                .as_any_mut()
                .downcast_mut::<RigidBodyComponent>()
                .map(|rigid_body| rigid_body.create_body(ctx))
        })
        .flatten()
    }

    fn rigid_body(&self, owner: BodyOwner) -> Option<&RigidBodyComponent> {
        self.nodes
            .get(owner.node)?
            .component_by_id(owner.component)?
            .as_any()
            .downcast_ref::<RigidBodyComponent>()
    }

    // --- Debug draw -------------------------------------------------------

    /// Lines between the origins of every node and its parent
    pub fn draw_hierarchy(&self, draw: &mut dyn DebugDraw) {
        for &root in &self.roots {
            self.draw_hierarchy_from(root, &Mat4::identity(), draw);
        }
    }

    fn draw_hierarchy_from(&self, id: NodeId, parent_world: &Mat4, draw: &mut dyn DebugDraw) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let world = parent_world * node.local_matrix();

        let parent_has_transform = node
            .parent
            .and_then(|parent| self.nodes.get(parent))
            .map_or(false, |parent| parent.transform.is_some());
        if parent_has_transform {
            draw.draw_line(parent_world.origin(), world.origin(), HIERARCHY_COLOR);
        }

        for &child in &node.children {
            self.draw_hierarchy_from(child, &world, draw);
        }
    }

    /// Bounding box of `node`, skipped while empty
    pub fn draw_bounding_box(&self, node: NodeId, draw: &mut dyn DebugDraw) {
        if let Some(node) = self.nodes.get(node) {
            draw.draw_aabb(&node.bounding_box, BOUNDS_COLOR);
        }
    }

    /// Collider overlay of every component in the scene
    pub fn draw_colliders(&self, draw: &mut dyn DebugDraw) {
        for (id, node) in &self.nodes {
            if node.component_count() == 0 {
                continue;
            }
            let world = self.world_matrix(id);
            for (_, component) in node.components() {
                component.debug_draw(&world, draw);
            }
        }
    }
}

impl MotionSync for SceneGraph {
    fn world_transform(&self, owner: BodyOwner) -> Option<Pose> {
        let rigid_body = self.rigid_body(owner)?;
        Some(rigid_body.world_pose(&self.world_matrix(owner.node)))
    }

    fn set_world_transform(&mut self, owner: BodyOwner, pose: &Pose) {
        let Some(rigid_body) = self.rigid_body(owner) else {
            return;
        };
        let current_world = self.world_matrix(owner.node);
        let new_world = rigid_body.node_matrix_from_pose(pose, &current_world);

        let parent_world = self.parent_world_matrix(owner.node);
        let Some(parent_inverse) = parent_world.try_inverse() else {
            log::warn!("Parent of {:?} has a singular transform, pose dropped", owner.node);
            return;
        };

        if let Some(transform) = self.transform_mut(owner.node) {
            transform.set_matrix(parent_inverse * new_world);
        }
    }
}
