//! Core engine implementation
//!
//! The engine owns the scene graph, the physics world and the editor state,
//! and runs one frame at a time:
//!
//! 1. application update
//! 2. scene graph update with the editor's [`FrameContext`](crate::scene::FrameContext)
//! 3. physics step, only while playing and not paused
//! 4. debug overlays
//! 5. frame pacing to the configured `max_fps`

use crate::{
    application::Application,
    config::{Config, ConfigError},
    debug::DebugDrawSystem,
    foundation::time::FrameTimer,
    physics::{BasicPhysicsWorld, PhysicsWorld},
    scene::{EditorState, SceneGraph},
    settings::Settings,
};
use thiserror::Error;

/// Which debug overlays are drawn at the end of each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebugOverlays {
    /// Parent-to-child lines
    pub hierarchy: bool,
    /// Node bounding boxes
    pub bounding_boxes: bool,
    /// Physics colliders
    pub colliders: bool,
}

impl DebugOverlays {
    /// Every overlay enabled
    pub fn all() -> Self {
        Self {
            hierarchy: true,
            bounding_boxes: true,
            colliders: true,
        }
    }
}

/// Main engine struct
///
/// The engine coordinates all subsystems and manages the main loop.
pub struct Engine {
    /// Scene graph holding every node
    pub scene: SceneGraph,

    /// Physics collaborator stepped while playing
    pub physics: Box<dyn PhysicsWorld>,

    /// Play/stop/pause controls
    pub editor: EditorState,

    /// Debug shapes emitted by the overlays
    pub debug_draw: DebugDrawSystem,

    /// Enabled overlays
    pub overlays: DebugOverlays,

    /// Frame timing
    timer: FrameTimer,

    /// Startup settings
    settings: Settings,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create an engine backed by [`BasicPhysicsWorld`]
    pub fn new(settings: Settings) -> Self {
        Self::with_physics(settings, Box::new(BasicPhysicsWorld::new()))
    }

    /// Create an engine with a custom physics world
    pub fn with_physics(settings: Settings, physics: Box<dyn PhysicsWorld>) -> Self {
        log::info!("Initializing engine (max fps: {})", settings.max_fps);

        Self {
            scene: SceneGraph::new(),
            physics,
            editor: EditorState::new(),
            debug_draw: DebugDrawSystem::new(),
            overlays: DebugOverlays::default(),
            timer: FrameTimer::with_max_fps(settings.max_fps),
            settings,
            running: true,
        }
    }

    /// Create an engine from a settings file, defaults when it is missing
    pub fn from_settings_file(path: &str) -> Result<Self, EngineError> {
        Ok(Self::new(Settings::load_or_default(path)?))
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application>(settings: Settings, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(settings);

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");

        while engine.running {
            let delta_time = engine.timer.tick();

            app.update(&mut engine, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;

            engine.frame(delta_time);
        }

        app.cleanup(&mut engine);
        engine.shutdown();

        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps)",
            engine.timer.frame_count(),
            engine.timer.average_fps()
        );
        Ok(())
    }

    /// Advance the scene, physics and overlays by one frame
    pub fn frame(&mut self, delta_time: f32) {
        self.debug_draw.update(delta_time);

        let frame = self.editor.frame(delta_time);
        self.scene.update(frame, self.physics.as_mut());

        if frame.play.playing && !frame.play.paused {
            self.physics.step(delta_time, &mut self.scene);
        }

        self.draw_overlays();
    }

    fn draw_overlays(&mut self) {
        if self.overlays.hierarchy {
            self.scene.draw_hierarchy(&mut self.debug_draw);
        }
        if self.overlays.bounding_boxes {
            let nodes: Vec<_> = self.scene.node_ids().collect();
            for node in nodes {
                self.scene.draw_bounding_box(node, &mut self.debug_draw);
            }
        }
        if self.overlays.colliders {
            self.scene.draw_colliders(&mut self.debug_draw);
        }
    }

    /// Destroy every node, releasing components and physics bodies
    pub fn shutdown(&mut self) {
        self.running = false;

        let roots = self.scene.roots().to_vec();
        for root in roots {
            if let Err(e) = self.scene.destroy_node(root, self.physics.as_mut()) {
                log::warn!("Failed to destroy node during shutdown: {}", e);
            }
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop keeps going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Startup settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }

    /// Number of frames run so far
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
