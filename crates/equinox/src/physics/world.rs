//! Physics collaborator contracts
//!
//! The scene graph never simulates anything itself. It asks a
//! [`PhysicsWorld`] to create and destroy bodies, tweaks body properties
//! through [`PhysicsBody`], and answers the world's pose queries through
//! [`MotionSync`] while the world steps.

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::foundation::math::{Pose, Vec3};
use crate::scene::{ComponentId, NodeId};

/// Gravity used when nothing else configures it
pub fn default_gravity() -> Vec3 {
    Vec3::new(0.0, -9.81, 0.0)
}

new_key_type! {
    /// Handle to a body owned by a physics world
    pub struct BodyHandle;
}

bitflags! {
    /// Collision flags carried by a physics body
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CollisionFlags: u32 {
        /// Body never moves (zero mass)
        const STATIC_OBJECT = 1;
        /// Body pose is authored by the scene, not the solver
        const KINEMATIC_OBJECT = 1 << 1;
        /// Body reports contacts but does not respond to them
        const NO_CONTACT_RESPONSE = 1 << 2;
    }
}

/// Scene-side owner of a body: the rigid-body component and its node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyOwner {
    /// Node the rigid-body component is attached to
    pub node: NodeId,
    /// The rigid-body component itself
    pub component: ComponentId,
}

/// Live body inside a physics world
pub trait PhysicsBody {
    /// Scene-side owner this body reports poses to
    fn owner(&self) -> BodyOwner;

    /// Gravity applied to this body
    fn gravity(&self) -> Vec3;

    /// Override the gravity applied to this body
    fn set_gravity(&mut self, gravity: Vec3);

    /// Current collision flags
    fn collision_flags(&self) -> CollisionFlags;

    /// Replace the collision flags
    fn set_collision_flags(&mut self, flags: CollisionFlags);

    /// Whether the body is driven by the scene
    fn is_kinematic(&self) -> bool {
        self.collision_flags().contains(CollisionFlags::KINEMATIC_OBJECT)
    }

    /// Body mass, zero for static bodies
    fn mass(&self) -> f32;

    /// Set the body mass
    fn set_mass(&mut self, mass: f32);

    /// Bounciness of the body
    fn restitution(&self) -> f32;

    /// Set the bounciness of the body
    fn set_restitution(&mut self, restitution: f32);

    /// Per-axis factor applied to linear motion
    fn linear_factor(&self) -> Vec3;

    /// Set the per-axis factor applied to linear motion
    fn set_linear_factor(&mut self, factor: Vec3);

    /// Per-axis factor applied to angular motion
    fn angular_factor(&self) -> Vec3;

    /// Set the per-axis factor applied to angular motion
    fn set_angular_factor(&mut self, factor: Vec3);
}

/// Pose exchange invoked by a physics world during [`PhysicsWorld::step`]
pub trait MotionSync {
    /// Pose the scene wants the body to have
    ///
    /// Used to seed new bodies and to drive kinematic ones.
    fn world_transform(&self, owner: BodyOwner) -> Option<Pose>;

    /// Pose the simulation produced for a dynamic body
    fn set_world_transform(&mut self, owner: BodyOwner, pose: &Pose);
}

/// Physics world the scene graph hands bodies to
pub trait PhysicsWorld {
    /// Ambient gravity of the world
    fn gravity(&self) -> Vec3;

    /// Create a box body with the given half extents
    fn add_box_body(&mut self, half_extents: Vec3, owner: BodyOwner, pose: Pose) -> BodyHandle;

    /// Create a sphere body
    fn add_sphere_body(&mut self, radius: f32, owner: BodyOwner, pose: Pose) -> BodyHandle;

    /// Create a capsule body aligned with the local Y axis
    fn add_capsule_body(&mut self, radius: f32, height: f32, owner: BodyOwner, pose: Pose) -> BodyHandle;

    /// Create a cylinder body aligned with the local Y axis
    fn add_cylinder_body(&mut self, half_extents: Vec3, owner: BodyOwner, pose: Pose) -> BodyHandle;

    /// Destroy a body. Unknown handles are ignored.
    fn remove_body(&mut self, handle: BodyHandle);

    /// Look up a live body
    fn body(&self, handle: BodyHandle) -> Option<&dyn PhysicsBody>;

    /// Look up a live body for modification
    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut dyn PhysicsBody>;

    /// Number of live bodies
    fn body_count(&self) -> usize;

    /// Advance the simulation by `delta_time` seconds
    ///
    /// Kinematic bodies pull their pose from `sync` before integration,
    /// dynamic bodies push their simulated pose back into it afterwards.
    fn step(&mut self, delta_time: f32, sync: &mut dyn MotionSync);
}
