//! Physics bridge
//!
//! Contracts the scene graph uses to talk to a physics engine, plus a small
//! gravity-only world used by the editor driver and tests.

pub mod world;
pub mod basic_world;

pub use world::{
    default_gravity,
    BodyHandle,
    BodyOwner,
    CollisionFlags,
    MotionSync,
    PhysicsBody,
    PhysicsWorld,
};
pub use basic_world::{BasicBody, BasicPhysicsWorld, BodyShape};
