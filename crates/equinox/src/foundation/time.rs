//! Time management utilities

use std::time::{Duration, Instant};

/// Frame timer with optional frame pacing
///
/// `tick` measures the time since the previous frame and, when a target
/// frame rate is set, sleeps away whatever is left of the frame budget.
pub struct FrameTimer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    frame_budget: Option<Duration>,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new timer without frame pacing
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            frame_budget: None,
        }
    }

    /// Create a timer that paces frames to at most `max_fps`
    ///
    /// A `max_fps` of zero disables pacing.
    pub fn with_max_fps(max_fps: u32) -> Self {
        Self {
            frame_budget: Self::budget_for(max_fps),
            ..Self::new()
        }
    }

    /// Change the frame-rate cap
    pub fn set_max_fps(&mut self, max_fps: u32) {
        self.frame_budget = Self::budget_for(max_fps);
    }

    /// Time allotted to one frame, if pacing is enabled
    pub fn frame_budget(&self) -> Option<Duration> {
        self.frame_budget
    }

    fn budget_for(max_fps: u32) -> Option<Duration> {
        (max_fps > 0).then(|| Duration::from_nanos(1_000_000_000 / u64::from(max_fps)))
    }

    /// Finish the current frame: wait out the frame budget and update timing
    ///
    /// Returns the delta time of the frame that just ended, in seconds.
    pub fn tick(&mut self) -> f32 {
        if let Some(budget) = self.frame_budget {
            let spent = self.last_frame.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            }
        }

        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_fps_disables_pacing() {
        assert!(FrameTimer::with_max_fps(0).frame_budget().is_none());
    }

    #[test]
    fn test_budget_matches_max_fps() {
        let timer = FrameTimer::with_max_fps(50);
        assert_eq!(timer.frame_budget(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_tick_waits_for_budget() {
        let mut timer = FrameTimer::with_max_fps(100);
        let delta = timer.tick();

        assert!(delta >= 0.009, "frame finished too early: {delta}");
        assert_eq!(timer.frame_count(), 1);
    }
}
