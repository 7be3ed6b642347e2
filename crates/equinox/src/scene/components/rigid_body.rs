//! Rigid-body component
//!
//! Bridges a node to a body living in a [`PhysicsWorld`]. The component owns
//! the body configuration; the physics world owns the body itself, which only
//! exists between `begin_play` and `end_play` (or an explicit
//! [`RigidBodyComponent::create_body`] commit from the editor).
//!
//! Every property setter caches its value on the component and forwards it
//! to the live body when there is one, so the same setter works in edit mode
//! and in play mode.
//!
//! Pose exchange with the physics world:
//! - pull: node world transform + rotated center offset -> body pose
//! - push: body pose - rotated center offset -> node world transform

use std::any::Any;

use crate::debug::{DebugDraw, COLLIDER_COLOR};
use crate::foundation::math::{Mat4, Pose, Transform, Vec3};
use crate::physics::{
    default_gravity, BodyHandle, BodyOwner, CollisionFlags, PhysicsBody, PhysicsWorld,
};
use crate::scene::component::{Component, ComponentBase, ComponentContext, ComponentKind};

/// Collision primitive used for the body
///
/// The meaning of the component's `size` depends on the shape:
/// - `Box`, `Cylinder`: half extents
/// - `Sphere`: `x` is the radius
/// - `Capsule`: `x` is the radius, `y` the height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColliderShape {
    /// Oriented box
    #[default]
    Box,
    /// Sphere
    Sphere,
    /// Capsule along local Y
    Capsule,
    /// Cylinder along local Y
    Cylinder,
}

/// Node component owning a physics body configuration
#[derive(Debug, Clone)]
pub struct RigidBodyComponent {
    base: ComponentBase,
    shape: ColliderShape,
    size: Vec3,
    center: Vec3,
    mass: f32,
    restitution: f32,
    kinematic: bool,
    linear_factor: Vec3,
    angular_factor: Vec3,
    gravity: Vec3,
    body: Option<BodyHandle>,
}

impl Default for RigidBodyComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBodyComponent {
    /// Unit box collider with mass 1
    pub fn new() -> Self {
        Self {
            base: ComponentBase::new(ComponentKind::RigidBody),
            shape: ColliderShape::Box,
            size: Vec3::repeat(0.5),
            center: Vec3::zeros(),
            mass: 1.0,
            restitution: 0.0,
            kinematic: false,
            linear_factor: Vec3::repeat(1.0),
            angular_factor: Vec3::repeat(1.0),
            gravity: default_gravity(),
            body: None,
        }
    }

    /// Builder pattern: Set collider shape
    pub fn with_shape(mut self, shape: ColliderShape) -> Self {
        self.shape = shape;
        self
    }

    /// Builder pattern: Set raw collider size
    pub fn with_size(mut self, size: Vec3) -> Self {
        self.size = size;
        self
    }

    /// Builder pattern: Sphere collider with the given radius
    pub fn with_sphere(mut self, radius: f32) -> Self {
        self.shape = ColliderShape::Sphere;
        self.set_radius(radius);
        self
    }

    /// Builder pattern: Capsule collider
    pub fn with_capsule(mut self, radius: f32, height: f32) -> Self {
        self.shape = ColliderShape::Capsule;
        self.size.x = radius;
        self.size.y = height;
        self
    }

    /// Builder pattern: Set center offset
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Builder pattern: Set mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Builder pattern: Set restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Builder pattern: Set kinematic flag
    pub fn with_kinematic(mut self, kinematic: bool) -> Self {
        self.kinematic = kinematic;
        self
    }

    /// Builder pattern: Set linear factor
    pub fn with_linear_factor(mut self, factor: Vec3) -> Self {
        self.linear_factor = factor;
        self
    }

    /// Builder pattern: Set angular factor
    pub fn with_angular_factor(mut self, factor: Vec3) -> Self {
        self.angular_factor = factor;
        self
    }

    // --- Pose exchange -----------------------------------------------------

    /// Body pose for a node whose world transform is `node_world`
    pub fn world_pose(&self, node_world: &Mat4) -> Pose {
        let node = Transform::from_matrix(node_world);
        let mut pose = node.to_pose();
        pose.translation.vector += node.rotation * self.center;
        pose
    }

    /// Node world transform matching a simulated body pose
    ///
    /// Scale is taken from `current_world` so the physics world never
    /// squashes the node.
    pub fn node_matrix_from_pose(&self, pose: &Pose, current_world: &Mat4) -> Mat4 {
        let rotation = pose.rotation;
        let position = pose.translation.vector - rotation * self.center;
        let scale = Transform::from_matrix(current_world).scale;

        Transform {
            position,
            rotation,
            scale,
        }
        .to_matrix()
    }

    // --- Body lifetime ----------------------------------------------------

    /// Create the physics body from the current configuration
    ///
    /// Any existing body is removed first; this doubles as the editor's
    /// "commit to physics engine" action after changing shape or size.
    pub fn create_body(&mut self, ctx: &mut ComponentContext<'_>) -> BodyHandle {
        if let Some(old) = self.body.take() {
            ctx.physics.remove_body(old);
        }

        let owner = BodyOwner {
            node: ctx.node_id,
            component: ctx.component_id,
        };
        let pose = self.world_pose(&ctx.world_matrix());
        let physics = &mut *ctx.physics;

        let handle = match self.shape {
            ColliderShape::Box => physics.add_box_body(self.size, owner, pose),
            ColliderShape::Sphere => physics.add_sphere_body(self.size.x, owner, pose),
            ColliderShape::Capsule => physics.add_capsule_body(self.size.x, self.size.y, owner, pose),
            ColliderShape::Cylinder => physics.add_cylinder_body(self.size, owner, pose),
        };
        self.body = Some(handle);
        log::debug!("{:?} body {:?} created for node {:?}", self.shape, handle, ctx.node_id);

        if let Some(body) = physics.body_mut(handle) {
            body.set_gravity(self.gravity);
        }
        self.set_kinematic(self.kinematic, physics);
        self.set_linear_factor(self.linear_factor, physics);
        self.set_angular_factor(self.angular_factor, physics);
        self.set_mass(self.mass, physics);
        self.set_restitution(self.restitution, physics);

        handle
    }

    /// Destroy the live body, if any
    pub fn remove_body(&mut self, physics: &mut dyn PhysicsWorld) {
        if let Some(handle) = self.body.take() {
            physics.remove_body(handle);
            log::debug!("Body {:?} removed", handle);
        }
    }

    /// Handle of the live body
    pub fn body_handle(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Whether a physics body currently exists
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    fn live_body<'p>(&self, physics: &'p mut dyn PhysicsWorld) -> Option<&'p mut dyn PhysicsBody> {
        physics.body_mut(self.body?)
    }

    // --- Properties -------------------------------------------------------

    /// Collider shape
    pub fn shape(&self) -> ColliderShape {
        self.shape
    }

    /// Change the collider shape; a live body keeps its old shape until recreated
    pub fn set_shape(&mut self, shape: ColliderShape) {
        self.shape = shape;
    }

    /// Raw collider size, see [`ColliderShape`]
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Change the raw collider size; a live body is not resized
    pub fn set_size(&mut self, size: Vec3) {
        self.size = size;
    }

    /// Radius for spheres and capsules
    pub fn radius(&self) -> f32 {
        self.size.x
    }

    /// Change the radius for spheres and capsules
    pub fn set_radius(&mut self, radius: f32) {
        self.size.x = radius;
    }

    /// Offset of the collider from the node origin
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Change the collider offset
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    /// Mass
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Change the mass
    pub fn set_mass(&mut self, mass: f32, physics: &mut dyn PhysicsWorld) {
        self.mass = mass;
        if let Some(body) = self.live_body(physics) {
            body.set_mass(mass);
        }
    }

    /// Restitution
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Change the restitution
    pub fn set_restitution(&mut self, restitution: f32, physics: &mut dyn PhysicsWorld) {
        self.restitution = restitution;
        if let Some(body) = self.live_body(physics) {
            body.set_restitution(restitution);
        }
    }

    /// Gravity applied to the body
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Change the gravity applied to the body
    pub fn set_gravity(&mut self, gravity: Vec3, physics: &mut dyn PhysicsWorld) {
        self.gravity = gravity;
        if let Some(body) = self.live_body(physics) {
            body.set_gravity(gravity);
        }
    }

    /// Whether the scene drives the body
    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    /// Toggle kinematic mode
    ///
    /// Setting sets the kinematic collision flag on the live body; clearing
    /// only touches the flags when the body is currently kinematic.
    pub fn set_kinematic(&mut self, kinematic: bool, physics: &mut dyn PhysicsWorld) {
        if let Some(body) = self.live_body(physics) {
            if kinematic {
                body.set_collision_flags(body.collision_flags() | CollisionFlags::KINEMATIC_OBJECT);
            } else if body.is_kinematic() {
                body.set_collision_flags(body.collision_flags() - CollisionFlags::KINEMATIC_OBJECT);
            }
        }
        self.kinematic = kinematic;
    }

    /// Per-axis linear motion factor
    pub fn linear_factor(&self) -> Vec3 {
        self.linear_factor
    }

    /// Change the per-axis linear motion factor
    pub fn set_linear_factor(&mut self, factor: Vec3, physics: &mut dyn PhysicsWorld) {
        self.linear_factor = factor;
        if let Some(body) = self.live_body(physics) {
            body.set_linear_factor(factor);
        }
    }

    /// Per-axis angular motion factor
    pub fn angular_factor(&self) -> Vec3 {
        self.angular_factor
    }

    /// Change the per-axis angular motion factor
    pub fn set_angular_factor(&mut self, factor: Vec3, physics: &mut dyn PhysicsWorld) {
        self.angular_factor = factor;
        if let Some(body) = self.live_body(physics) {
            body.set_angular_factor(factor);
        }
    }
}

impl Component for RigidBodyComponent {
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

    fn attached(&mut self, ctx: &mut ComponentContext<'_>) {
        let bounds = ctx.node.bounding_box;
        if !bounds.is_empty() {
            self.center = bounds.center();
            self.size = bounds.half_size();
        }
        self.gravity = ctx.physics.gravity();
    }

    fn begin_play(&mut self, ctx: &mut ComponentContext<'_>) {
        self.create_body(ctx);
    }

    fn end_play(&mut self, ctx: &mut ComponentContext<'_>) {
        self.remove_body(ctx.physics);
    }

    fn clean_up(&mut self, ctx: &mut ComponentContext<'_>) {
        self.remove_body(ctx.physics);
    }

    fn debug_draw(&self, world: &Mat4, draw: &mut dyn DebugDraw) {
        let pose = self.world_pose(world);
        let center = pose.translation.vector;

        match self.shape {
            ColliderShape::Box => draw.draw_box(center, self.size, pose.rotation, COLLIDER_COLOR),
            ColliderShape::Sphere => draw.draw_sphere(center, self.size.x, COLLIDER_COLOR),
            ColliderShape::Capsule => {
                let half_axis = pose.rotation * Vec3::new(0.0, self.size.y * 0.5, 0.0);
                draw.draw_capsule(center - half_axis, center + half_axis, self.size.x, COLLIDER_COLOR);
            }
            // Drawn as its bounding box
            ColliderShape::Cylinder => draw.draw_box(center, self.size, pose.rotation, COLLIDER_COLOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Quat, Translation3};
    use crate::testing::{test_owner, RecordingPhysics};
    use approx::assert_relative_eq;

    fn live_component(physics: &mut RecordingPhysics) -> RigidBodyComponent {
        let mut component = RigidBodyComponent::new();
        component.body = Some(physics.add_box_body(Vec3::repeat(0.5), test_owner(), Pose::identity()));
        component
    }

    #[test]
    fn test_setters_cache_without_body() {
        let mut physics = RecordingPhysics::default();
        let mut component = RigidBodyComponent::new();

        component.set_mass(3.0, &mut physics);
        component.set_restitution(0.4, &mut physics);
        component.set_kinematic(true, &mut physics);
        component.set_gravity(Vec3::new(0.0, -1.0, 0.0), &mut physics);

        assert_eq!(component.mass(), 3.0);
        assert_eq!(component.restitution(), 0.4);
        assert!(component.is_kinematic());
        assert_relative_eq!(component.gravity(), Vec3::new(0.0, -1.0, 0.0));
        assert!(physics.created.is_empty());
    }

    #[test]
    fn test_setters_forward_to_live_body() {
        let mut physics = RecordingPhysics::default();
        let mut component = live_component(&mut physics);
        let handle = component.body_handle().unwrap();

        component.set_mass(7.5, &mut physics);
        component.set_linear_factor(Vec3::new(1.0, 0.0, 1.0), &mut physics);
        component.set_angular_factor(Vec3::zeros(), &mut physics);

        let body = physics.body(handle).unwrap();
        assert_eq!(body.mass(), 7.5);
        assert_relative_eq!(body.linear_factor(), Vec3::new(1.0, 0.0, 1.0));
        assert_relative_eq!(body.angular_factor(), Vec3::zeros());
    }

    #[test]
    fn test_kinematic_toggle_is_idempotent() {
        let mut physics = RecordingPhysics::default();
        let mut component = live_component(&mut physics);
        let handle = component.body_handle().unwrap();
        physics
            .body_mut(handle)
            .unwrap()
            .set_collision_flags(CollisionFlags::NO_CONTACT_RESPONSE);

        component.set_kinematic(true, &mut physics);
        component.set_kinematic(true, &mut physics);
        assert_eq!(
            physics.body(handle).unwrap().collision_flags(),
            CollisionFlags::NO_CONTACT_RESPONSE | CollisionFlags::KINEMATIC_OBJECT
        );

        component.set_kinematic(false, &mut physics);
        component.set_kinematic(false, &mut physics);
        assert_eq!(
            physics.body(handle).unwrap().collision_flags(),
            CollisionFlags::NO_CONTACT_RESPONSE
        );
    }

    #[test]
    fn test_size_change_does_not_touch_live_body() {
        let mut physics = RecordingPhysics::default();
        let mut component = live_component(&mut physics);

        component.set_shape(ColliderShape::Sphere);
        component.set_radius(4.0);

        assert_eq!(physics.created.len(), 1);
        assert!(physics.removed.is_empty());
    }

    #[test]
    fn test_pose_roundtrip_with_center_offset() {
        let component = RigidBodyComponent::new().with_center(Vec3::new(0.0, 1.0, 0.5));
        let pose = Pose::from_parts(
            Translation3::new(3.0, -2.0, 1.0),
            Quat::from_axis_angle(&Vec3::z_axis(), 0.8),
        );

        let node_world = component.node_matrix_from_pose(&pose, &Mat4::identity());
        let pulled = component.world_pose(&node_world);

        assert_relative_eq!(pulled.translation.vector, pose.translation.vector, epsilon = 1e-5);
        assert!(pulled.rotation.angle_to(&pose.rotation) < 1e-4);
    }

    #[test]
    fn test_push_keeps_node_scale() {
        let component = RigidBodyComponent::new();
        let current = Transform {
            scale: Vec3::new(2.0, 2.0, 2.0),
            ..Transform::default()
        }
        .to_matrix();

        let world = component.node_matrix_from_pose(&Pose::translation(0.0, 4.0, 0.0), &current);

        assert_relative_eq!(Transform::from_matrix(&world).scale, Vec3::repeat(2.0), epsilon = 1e-5);
        assert_relative_eq!(world.translation_part(), Vec3::new(0.0, 4.0, 0.0), epsilon = 1e-6);
    }
}
