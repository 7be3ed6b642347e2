//! Minimal reference physics world
//!
//! Integrates gravity for dynamic bodies and keeps kinematic bodies glued to
//! their scene pose. There is no broad-phase, narrow-phase or contact solver;
//! a real backend replaces this type behind the [`PhysicsWorld`] trait.

use slotmap::SlotMap;

use super::world::{
    default_gravity, BodyHandle, BodyOwner, CollisionFlags, MotionSync, PhysicsBody, PhysicsWorld,
};
use crate::foundation::math::{Pose, Vec3};

/// Collision geometry of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    /// Box with half extents
    Box {
        /// Half size along each local axis
        half_extents: Vec3,
    },
    /// Sphere
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Capsule along local Y
    Capsule {
        /// Cap radius
        radius: f32,
        /// Length of the cylindrical section
        height: f32,
    },
    /// Cylinder along local Y
    Cylinder {
        /// Half size along each local axis
        half_extents: Vec3,
    },
}

/// Body simulated by [`BasicPhysicsWorld`]
#[derive(Debug, Clone)]
pub struct BasicBody {
    shape: BodyShape,
    owner: BodyOwner,
    pose: Pose,
    linear_velocity: Vec3,
    gravity: Vec3,
    flags: CollisionFlags,
    mass: f32,
    restitution: f32,
    linear_factor: Vec3,
    angular_factor: Vec3,
}

impl BasicBody {
    fn new(shape: BodyShape, owner: BodyOwner, pose: Pose, gravity: Vec3) -> Self {
        Self {
            shape,
            owner,
            pose,
            linear_velocity: Vec3::zeros(),
            gravity,
            flags: CollisionFlags::empty(),
            mass: 1.0,
            restitution: 0.0,
            linear_factor: Vec3::repeat(1.0),
            angular_factor: Vec3::repeat(1.0),
        }
    }

    /// Collision geometry
    pub fn shape(&self) -> BodyShape {
        self.shape
    }

    /// Current simulated pose
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Current linear velocity
    pub fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    /// Whether the solver moves this body
    pub fn is_dynamic(&self) -> bool {
        !self
            .flags
            .intersects(CollisionFlags::STATIC_OBJECT | CollisionFlags::KINEMATIC_OBJECT)
    }
}

impl PhysicsBody for BasicBody {
    fn owner(&self) -> BodyOwner {
        self.owner
    }

    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    fn collision_flags(&self) -> CollisionFlags {
        self.flags
    }

    fn set_collision_flags(&mut self, flags: CollisionFlags) {
        self.flags = flags;
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn set_mass(&mut self, mass: f32) {
        // Zero mass turns the body static
        self.mass = mass.max(0.0);
        self.flags.set(CollisionFlags::STATIC_OBJECT, self.mass == 0.0);
        if self.mass == 0.0 {
            self.linear_velocity = Vec3::zeros();
        }
    }

    fn restitution(&self) -> f32 {
        self.restitution
    }

    fn set_restitution(&mut self, restitution: f32) {
        self.restitution = restitution;
    }

    fn linear_factor(&self) -> Vec3 {
        self.linear_factor
    }

    fn set_linear_factor(&mut self, factor: Vec3) {
        self.linear_factor = factor;
    }

    fn angular_factor(&self) -> Vec3 {
        self.angular_factor
    }

    fn set_angular_factor(&mut self, factor: Vec3) {
        self.angular_factor = factor;
    }
}

/// Gravity-only physics world
pub struct BasicPhysicsWorld {
    gravity: Vec3,
    bodies: SlotMap<BodyHandle, BasicBody>,
}

impl BasicPhysicsWorld {
    /// Create a world with the default gravity
    pub fn new() -> Self {
        Self::with_gravity(default_gravity())
    }

    /// Create a world with a custom ambient gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            bodies: SlotMap::with_key(),
        }
    }

    /// Change the ambient gravity used for bodies created from now on
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Typed access to a body
    pub fn basic_body(&self, handle: BodyHandle) -> Option<&BasicBody> {
        self.bodies.get(handle)
    }

    fn insert(&mut self, shape: BodyShape, owner: BodyOwner, pose: Pose) -> BodyHandle {
        let handle = self.bodies.insert(BasicBody::new(shape, owner, pose, self.gravity));
        log::debug!("Created {:?} body {:?} for {:?}", shape, handle, owner);
        handle
    }
}

impl Default for BasicPhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld for BasicPhysicsWorld {
    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn add_box_body(&mut self, half_extents: Vec3, owner: BodyOwner, pose: Pose) -> BodyHandle {
        self.insert(BodyShape::Box { half_extents }, owner, pose)
    }

    fn add_sphere_body(&mut self, radius: f32, owner: BodyOwner, pose: Pose) -> BodyHandle {
        self.insert(BodyShape::Sphere { radius }, owner, pose)
    }

    fn add_capsule_body(&mut self, radius: f32, height: f32, owner: BodyOwner, pose: Pose) -> BodyHandle {
        self.insert(BodyShape::Capsule { radius, height }, owner, pose)
    }

    fn add_cylinder_body(&mut self, half_extents: Vec3, owner: BodyOwner, pose: Pose) -> BodyHandle {
        self.insert(BodyShape::Cylinder { half_extents }, owner, pose)
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        if self.bodies.remove(handle).is_some() {
            log::debug!("Removed body {:?}", handle);
        }
    }

    fn body(&self, handle: BodyHandle) -> Option<&dyn PhysicsBody> {
        self.bodies.get(handle).map(|body| body as &dyn PhysicsBody)
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut dyn PhysicsBody> {
        self.bodies.get_mut(handle).map(|body| body as &mut dyn PhysicsBody)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn step(&mut self, delta_time: f32, sync: &mut dyn MotionSync) {
        for body in self.bodies.values_mut() {
            if !body.is_dynamic() {
                if let Some(pose) = sync.world_transform(body.owner) {
                    body.pose = pose;
                }
                body.linear_velocity = Vec3::zeros();
                continue;
            }

            // Semi-implicit Euler, locked axes stay put
            let acceleration = body.gravity.component_mul(&body.linear_factor);
            body.linear_velocity += acceleration * delta_time;
            body.linear_velocity = body.linear_velocity.component_mul(&body.linear_factor);
            body.pose.translation.vector += body.linear_velocity * delta_time;

            sync.set_world_transform(body.owner, &body.pose);
        }
    }
}
