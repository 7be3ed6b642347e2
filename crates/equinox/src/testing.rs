//! Test doubles shared by unit and scenario tests

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use slotmap::SlotMap;

use crate::foundation::math::{Pose, Vec3};
use crate::physics::{
    default_gravity, BodyHandle, BodyOwner, BodyShape, CollisionFlags, MotionSync, PhysicsBody,
    PhysicsWorld,
};
use crate::scene::{Component, ComponentBase, ComponentContext, ComponentId, ComponentKind, NodeId};

/// Owner pointing at nothing, for bodies created outside a scene
pub fn test_owner() -> BodyOwner {
    BodyOwner {
        node: NodeId::default(),
        component: ComponentId::new(0),
    }
}

/// `MotionSync` that serves one fixed pose and records every push
#[derive(Debug, Default)]
pub struct PoseLog {
    pub scene_pose: Option<Pose>,
    pub pushed: Vec<(BodyOwner, Pose)>,
}

impl MotionSync for PoseLog {
    fn world_transform(&self, _owner: BodyOwner) -> Option<Pose> {
        self.scene_pose
    }

    fn set_world_transform(&mut self, owner: BodyOwner, pose: &Pose) {
        self.pushed.push((owner, *pose));
    }
}

/// Body stored by [`RecordingPhysics`]
#[derive(Debug, Clone)]
pub struct FakeBody {
    pub owner: BodyOwner,
    pub shape: BodyShape,
    pub pose: Pose,
    pub gravity: Vec3,
    pub flags: CollisionFlags,
    pub mass: f32,
    pub restitution: f32,
    pub linear_factor: Vec3,
    pub angular_factor: Vec3,
}

impl PhysicsBody for FakeBody {
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
        self.mass = mass;
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

/// Physics world that stores bodies without simulating them
///
/// `step` pulls every body's pose from the scene, or pushes the scripted
/// `next_pose` when one is set.
#[derive(Debug)]
pub struct RecordingPhysics {
    pub gravity: Vec3,
    pub bodies: SlotMap<BodyHandle, FakeBody>,
    pub created: Vec<(BodyShape, BodyOwner)>,
    pub removed: Vec<BodyHandle>,
    pub next_pose: Option<Pose>,
    pub steps: usize,
}

impl Default for RecordingPhysics {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            bodies: SlotMap::with_key(),
            created: Vec::new(),
            removed: Vec::new(),
            next_pose: None,
            steps: 0,
        }
    }
}

impl RecordingPhysics {
    pub fn fake_body(&self, handle: BodyHandle) -> Option<&FakeBody> {
        self.bodies.get(handle)
    }

    fn insert(&mut self, shape: BodyShape, owner: BodyOwner, pose: Pose) -> BodyHandle {
        self.created.push((shape, owner));
        self.bodies.insert(FakeBody {
            owner,
            shape,
            pose,
            gravity: Vec3::zeros(),
            flags: CollisionFlags::empty(),
            mass: 0.0,
            restitution: 0.0,
            linear_factor: Vec3::repeat(1.0),
            angular_factor: Vec3::repeat(1.0),
        })
    }
}

impl PhysicsWorld for RecordingPhysics {
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
            self.removed.push(handle);
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

    fn step(&mut self, _delta_time: f32, sync: &mut dyn MotionSync) {
        self.steps += 1;
        for body in self.bodies.values_mut() {
            match self.next_pose {
                Some(pose) => {
                    body.pose = pose;
                    sync.set_world_transform(body.owner, &pose);
                }
                None => {
                    if let Some(pose) = sync.world_transform(body.owner) {
                        body.pose = pose;
                    }
                }
            }
        }
    }
}

/// Lifecycle call observed by [`RecordingComponent`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hook {
    Attached,
    BeginPlay,
    Update(f32),
    EditorUpdate(f32),
    EndPlay,
    CleanUp,
    Snapshot,
    Restore,
}

/// Shared log of hook calls
pub type HookLog = Rc<RefCell<Vec<Hook>>>;

/// Component that records every hook it receives
pub struct RecordingComponent {
    base: ComponentBase,
    log: HookLog,
}

impl RecordingComponent {
    pub fn new(name: &'static str) -> (Self, HookLog) {
        let log = HookLog::default();
        let component = Self {
            base: ComponentBase::new(ComponentKind::Custom(name)),
            log: Rc::clone(&log),
        };
        (component, log)
    }

    pub fn disabled(name: &'static str) -> (Self, HookLog) {
        let (mut component, log) = Self::new(name);
        component.base.set_enabled(false);
        (component, log)
    }

    fn record(&self, hook: Hook) {
        self.log.borrow_mut().push(hook);
    }
}

impl Component for RecordingComponent {
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

    fn attached(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record(Hook::Attached);
    }

    fn begin_play(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record(Hook::BeginPlay);
    }

    fn update(&mut self, _ctx: &mut ComponentContext<'_>, delta_time: f32) {
        self.record(Hook::Update(delta_time));
    }

    fn editor_update(&mut self, _ctx: &mut ComponentContext<'_>, delta_time: f32) {
        self.record(Hook::EditorUpdate(delta_time));
    }

    fn end_play(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record(Hook::EndPlay);
    }

    fn clean_up(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record(Hook::CleanUp);
    }

    fn snapshot_state(&mut self) {
        self.record(Hook::Snapshot);
    }

    fn restore_state(&mut self) {
        self.record(Hook::Restore);
    }
}

/// Count of hooks matching `pred`
pub fn count(log: &HookLog, pred: impl Fn(&Hook) -> bool) -> usize {
    log.borrow().iter().filter(|hook| pred(hook)).count()
}
