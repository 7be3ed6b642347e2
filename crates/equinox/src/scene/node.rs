//! Scene-graph node ("game object")

use std::fmt;

use slotmap::new_key_type;

use super::component::{Component, ComponentKind};
use super::components::TransformComponent;
use crate::foundation::math::{Aabb, Mat4};

new_key_type! {
    /// Stable identifier of a node inside a [`SceneGraph`](super::SceneGraph)
    pub struct NodeId;
}

/// Identifier of a component, unique within its scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owned component plus its id
///
/// The component is only `None` while one of its own hooks is running.
pub(super) struct ComponentSlot {
    pub(super) id: ComponentId,
    pub(super) component: Option<Box<dyn Component>>,
}

/// Tree element owning a list of components
///
/// Parent/child links are kept consistent by [`SceneGraph`](super::SceneGraph);
/// nodes only expose read access to them.
pub struct Node {
    name: String,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub(super) components: Vec<ComponentSlot>,
    pub(super) transform: Option<ComponentId>,
    pub(super) is_playing: bool,

    /// Local bounds, empty until a component defines geometry
    pub bounding_box: Aabb,
}

impl Node {
    pub(super) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            components: Vec::new(),
            transform: None,
            is_playing: false,
            bounding_box: Aabb::negative_infinity(),
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the node
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Parent node, `None` for roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node has no parent
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Play flag observed during the node's last update
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Number of owned components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Components in insertion order
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &dyn Component)> {
        self.components
            .iter()
            .filter_map(|slot| slot.component.as_deref().map(|component| (slot.id, component)))
    }

    /// First component whose symbolic name matches
    pub fn component_by_name(&self, name: &str) -> Option<&dyn Component> {
        self.components()
            .map(|(_, component)| component)
            .find(|component| component.name() == name)
    }

    /// First component of the given kind
    pub fn component_by_kind(&self, kind: ComponentKind) -> Option<&dyn Component> {
        self.components()
            .map(|(_, component)| component)
            .find(|component| component.kind() == kind)
    }

    /// Component with the given id
    pub fn component_by_id(&self, id: ComponentId) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|slot| slot.id == id)
            .and_then(|slot| slot.component.as_deref())
    }

    /// Mutable component with the given id
    pub fn component_by_id_mut(&mut self, id: ComponentId) -> Option<&mut dyn Component> {
        let slot = self.components.iter_mut().find(|slot| slot.id == id)?;
        let component: &mut dyn Component = slot.component.as_mut()?.as_mut();
        Some(component)
    }

    /// First component of concrete type `T`
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.components()
            .find_map(|(_, component)| component.as_any().downcast_ref::<T>())
    }

    /// First component of concrete type `T`, mutably
    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .filter_map(|slot| slot.component.as_mut())
            .find_map(|component| component.as_any_mut().downcast_mut::<T>())
    }

    /// Id of the cached transform component
    pub fn transform_id(&self) -> Option<ComponentId> {
        self.transform
    }

    /// The node's transform component, if one was added
    pub fn transform(&self) -> Option<&TransformComponent> {
        self.component_by_id(self.transform?)?
            .as_any()
            .downcast_ref::<TransformComponent>()
    }

    /// The node's transform component, mutably
    pub fn transform_mut(&mut self) -> Option<&mut TransformComponent> {
        let id = self.transform?;
        self.component_by_id_mut(id)?
            .as_any_mut()
            .downcast_mut::<TransformComponent>()
    }

    /// Local transform matrix, identity without a transform component
    pub fn local_matrix(&self) -> Mat4 {
        self.transform()
            .map_or_else(Mat4::identity, |transform| *transform.matrix())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("components", &self.components().map(|(_, c)| c.name()).collect::<Vec<_>>())
            .field("is_playing", &self.is_playing)
            .finish()
    }
}
