//! Frames-per-second estimator
//!
//! Keeps the durations of the last N frames and reports their moving
//! average as a rate. Recomputed on every query.

use std::collections::VecDeque;

/// Default number of frames averaged
pub const DEFAULT_FPS_WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FpsCounter {
    last_tick: f64,
    frame_times: VecDeque<f64>,
    capacity: usize,
}

impl FpsCounter {
    /// Start counting from `now` (seconds) with a window of `capacity` frames
    pub fn new(now: f64, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            last_tick: now,
            frame_times: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record one frame ending at `now` (seconds)
    pub fn tick(&mut self, now: f64) {
        let dt = now - self.last_tick;
        self.last_tick = now;
        if self.frame_times.len() == self.capacity {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);
    }

    /// Frames per second over the window, 0 before any time has elapsed
    pub fn get_fps(&self) -> f64 {
        let total: f64 = self.frame_times.iter().sum();
        if total == 0.0 {
            return 0.0;
        }
        self.frame_times.len() as f64 / total
    }
}
