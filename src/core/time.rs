//! Game clock driving animation sampling

use std::time::{Duration, Instant};

/// Tracks frame timing and the scaled game time fed to animators
pub struct GameClock {
    start: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    /// Game time accumulated at the last speed change
    base_game_time: f64,
    /// Wall time of the last speed change
    speed_changed_at: Instant,
    speed: f32,
}

impl GameClock {
    /// Create a new clock running at normal speed
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            base_game_time: 0.0,
            speed_changed_at: now,
            speed: 1.0,
        }
    }

    /// Call once per frame to update timing
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Wall-clock seconds since the clock was created
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Scaled game time in seconds, as sampled at the last `tick`
    pub fn game_time(&self) -> f32 {
        let since_change = self.last_frame.saturating_duration_since(self.speed_changed_at);
        (self.base_game_time + since_change.as_secs_f64() * f64::from(self.speed)) as f32
    }

    /// Current speed multiplier
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Change the speed multiplier. Game time accumulated so far is kept.
    pub fn set_speed(&mut self, speed: f32) {
        let now = Instant::now();
        let since_change = now.saturating_duration_since(self.speed_changed_at);
        self.base_game_time += since_change.as_secs_f64() * f64::from(self.speed);
        self.speed_changed_at = now;
        self.last_frame = self.last_frame.max(now);
        self.speed = speed;
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}
