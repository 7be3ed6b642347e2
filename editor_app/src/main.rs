//! Editor driver
//!
//! Builds a small scene (a static ground, a falling ball parented to a
//! spinning pivot) and runs it through one edit -> play -> stop cycle,
//! logging where the ball ends up.

use std::any::Any;

use equinox::foundation::logging;
use equinox::foundation::math::Mat4Ext;
use equinox::prelude::*;
use equinox::settings::SETTINGS_FILE;

const EDIT_FRAMES: u64 = 10;
const PLAY_FRAMES: u64 = 90;
const STOP_FRAMES: u64 = 5;

/// Spins its node around Y while playing
struct Spinner {
    base: ComponentBase,
    speed: f32,
}

impl Spinner {
    fn new(speed: f32) -> Self {
        Self {
            base: ComponentBase::new(ComponentKind::Custom("Spinner")),
            speed,
        }
    }
}

impl Component for Spinner {
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

    fn begin_play(&mut self, ctx: &mut ComponentContext<'_>) {
        log::info!("Spinner on '{}' started", ctx.node.name());
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) {
        if let Some(transform) = ctx.node.transform_mut() {
            let step = Quat::from_axis_angle(&Vec3::y_axis(), self.speed * delta_time);
            let rotation = step * transform.rotation();
            transform.set_rotation(rotation);
        }
    }
}

struct EditorDemo {
    ball: Option<NodeId>,
}

impl EditorDemo {
    fn new() -> Self {
        Self { ball: None }
    }

    fn log_ball(&self, engine: &Engine, label: &str) {
        let Some(ball) = self.ball else {
            return;
        };
        let position = engine.scene.world_matrix(ball).translation_part();
        log::info!(
            "[{}] ball at ({:.3}, {:.3}, {:.3}), {} live bodies",
            label,
            position.x,
            position.y,
            position.z,
            engine.physics.body_count()
        );
    }
}

impl Application for EditorDemo {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let scene = &mut engine.scene;
        let physics = engine.physics.as_mut();

        let ground = scene.create_node("Ground");
        if let Some(node) = scene.node_mut(ground) {
            node.bounding_box = Aabb::new(Vec3::new(-10.0, -0.5, -10.0), Vec3::new(10.0, 0.0, 10.0));
        }
        scene.add_component(ground, TransformComponent::identity(), physics)?;
        scene.add_component(ground, RigidBodyComponent::new().with_mass(0.0), physics)?;

        let pivot = scene.create_node("Pivot");
        scene.add_component(pivot, TransformComponent::from_position(Vec3::new(0.0, 5.0, 0.0)), physics)?;
        scene.add_component(pivot, Spinner::new(1.0), physics)?;

        let ball = scene.create_child(pivot, "Ball")?;
        scene.add_component(ball, TransformComponent::from_position(Vec3::new(1.0, 0.0, 0.0)), physics)?;
        scene.add_component(ball, RigidBodyComponent::new().with_sphere(0.5).with_restitution(0.5), physics)?;

        engine.overlays = DebugOverlays::all();
        self.ball = Some(ball);
        self.log_ball(engine, "edit");
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        let frame = engine.frame_count();

        if frame == EDIT_FRAMES {
            engine.editor.play();
        } else if frame == EDIT_FRAMES + PLAY_FRAMES {
            self.log_ball(engine, "play");
            engine.editor.stop();
        } else if frame == EDIT_FRAMES + PLAY_FRAMES + STOP_FRAMES {
            self.log_ball(engine, "stopped");
            log::info!("{} debug shapes on the last frame", engine.debug_draw.shape_count());
            engine.quit();
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!("Tearing down {} nodes", engine.scene.len());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default(SETTINGS_FILE)?;
    logging::init_with_level(&settings.log_level);
    log::info!("Settings: {:?}", settings);

    let mut app = EditorDemo::new();
    Engine::run(settings, &mut app)?;
    Ok(())
}
