//! Editor play state and per-frame update mode

/// Editor-wide play/pause flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayState {
    /// Simulation is running (or paused inside play mode)
    pub playing: bool,
    /// Editor is paused
    pub paused: bool,
}

impl PlayState {
    /// Editing, not paused
    pub const EDITING: Self = Self {
        playing: false,
        paused: false,
    };

    /// Playing, not paused
    pub const PLAYING: Self = Self {
        playing: true,
        paused: false,
    };
}

/// Inputs passed down the hierarchy for a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// Play state for this frame
    pub play: PlayState,
}

impl FrameContext {
    /// Bundle frame inputs
    pub fn new(delta_time: f32, play: PlayState) -> Self {
        Self { delta_time, play }
    }
}

/// Play/stop/pause controls owned by the editor
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    play: PlayState,
}

impl EditorState {
    /// Start in edit mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter play mode
    pub fn play(&mut self) {
        if !self.play.playing {
            log::info!("Entering play mode");
        }
        self.play.playing = true;
        self.play.paused = false;
    }

    /// Leave play mode
    pub fn stop(&mut self) {
        if self.play.playing {
            log::info!("Leaving play mode");
        }
        self.play.playing = false;
        self.play.paused = false;
    }

    /// Pause the editor
    pub fn pause(&mut self) {
        self.play.paused = true;
    }

    /// Resume after a pause
    pub fn resume(&mut self) {
        self.play.paused = false;
    }

    /// Whether play mode is active
    pub fn is_playing(&self) -> bool {
        self.play.playing
    }

    /// Whether the editor is paused
    pub fn is_paused(&self) -> bool {
        self.play.paused
    }

    /// Current flags
    pub fn play_state(&self) -> PlayState {
        self.play
    }

    /// Frame inputs for a frame lasting `delta_time`
    pub fn frame(&self, delta_time: f32) -> FrameContext {
        FrameContext::new(delta_time, self.play)
    }
}

/// Which hooks a node delivers this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Not playing: `editor_update(dt)`
    EditorEditing,
    /// Not playing and paused: `editor_update(0)`
    EditorPaused,
    /// First playing frame: `begin_play`
    PlayToRun,
    /// Playing: `update(dt)`
    PlayRunning,
    /// First frame after play: `end_play`
    PlayToStop,
}

impl UpdateMode {
    /// Mode for a node that was playing (`previous_playing`) last frame
    ///
    /// The pause flag only matters outside play mode.
    pub fn resolve(previous_playing: bool, play: PlayState) -> Self {
        match (previous_playing, play.playing) {
            (false, true) => Self::PlayToRun,
            (true, false) => Self::PlayToStop,
            (true, true) => Self::PlayRunning,
            (false, false) if play.paused => Self::EditorPaused,
            (false, false) => Self::EditorEditing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert_eq!(UpdateMode::resolve(false, PlayState::EDITING), UpdateMode::EditorEditing);
        assert_eq!(UpdateMode::resolve(false, PlayState::PLAYING), UpdateMode::PlayToRun);
        assert_eq!(UpdateMode::resolve(true, PlayState::PLAYING), UpdateMode::PlayRunning);
        assert_eq!(UpdateMode::resolve(true, PlayState::EDITING), UpdateMode::PlayToStop);
    }

    #[test]
    fn test_pause_only_applies_while_editing() {
        let paused_edit = PlayState {
            playing: false,
            paused: true,
        };
        let paused_play = PlayState {
            playing: true,
            paused: true,
        };

        assert_eq!(UpdateMode::resolve(false, paused_edit), UpdateMode::EditorPaused);
        assert_eq!(UpdateMode::resolve(true, paused_play), UpdateMode::PlayRunning);
    }

    #[test]
    fn test_editor_state_controls() {
        let mut editor = EditorState::new();
        editor.pause();
        assert!(editor.is_paused());

        editor.play();
        assert!(editor.is_playing());
        assert!(!editor.is_paused());

        let frame = editor.frame(0.25);
        assert_eq!(frame.delta_time, 0.25);
        assert_eq!(frame.play, PlayState::PLAYING);

        editor.stop();
        assert_eq!(editor.play_state(), PlayState::EDITING);
    }
}
