//! Frame timing utilities

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// FPS statistics for a time window
#[derive(Debug, Clone, Copy)]
pub struct FpsWindow {
    pub avg: f32,
    pub min: f32,
    pub max: f32,
}

/// Tracks frame timing and calculates FPS
///
/// The timer only measures wall-clock deltas; it never drives updates
/// itself. Callers read `delta_secs` each frame and feed it into
/// `GrassSession::frame`, which keeps simulation stepping injectable.
pub struct FrameTimer {
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    fps_timer: Instant,
    fps: f32,
    fps_frame_count: u32,
    /// Ring buffer of (timestamp, frame_time_secs) for rolling stats
    frame_history: VecDeque<(Instant, f32)>,
}

impl FrameTimer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            fps_timer: now,
            fps: 0.0,
            fps_frame_count: 0,
            frame_history: VecDeque::new(),
        }
    }

    /// Call once per frame to update timing
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.frame_count += 1;
        self.fps_frame_count += 1;

        self.frame_history.push_back((now, self.delta.as_secs_f32()));

        // Prune frames older than the largest stats window
        let cutoff = now - Duration::from_secs(5);
        while let Some(&(timestamp, _)) = self.frame_history.front() {
            if timestamp < cutoff {
                self.frame_history.pop_front();
            } else {
                break;
            }
        }

        // Update FPS every second
        let fps_elapsed = now - self.fps_timer;
        if fps_elapsed >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_timer = now;
        }
    }

    /// Get delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get current FPS (updated every second)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Rolling FPS statistics over the given window (capped at 5 s of history)
    pub fn window_stats(&self, window: Duration) -> FpsWindow {
        let cutoff = Instant::now() - window;

        let mut frame_count = 0;
        let mut total_time = 0.0f32;
        let mut min_fps = f32::INFINITY;
        let mut max_fps = 0.0f32;

        for &(timestamp, frame_time) in self.frame_history.iter() {
            if timestamp >= cutoff {
                frame_count += 1;
                total_time += frame_time;

                let fps = if frame_time > 0.0 { 1.0 / frame_time } else { 0.0 };
                min_fps = min_fps.min(fps);
                max_fps = max_fps.max(fps);
            }
        }

        let avg = if total_time > 0.0 {
            frame_count as f32 / total_time
        } else {
            0.0
        };

        if frame_count == 0 {
            min_fps = 0.0;
            max_fps = 0.0;
        }

        FpsWindow { avg, min: min_fps, max: max_fps }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_counts() {
        let mut timer = FrameTimer::new();
        timer.tick();
        timer.tick();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.delta_secs() >= 0.0);
    }

    #[test]
    fn test_empty_window_stats() {
        let timer = FrameTimer::new();
        let stats = timer.window_stats(Duration::from_secs(1));
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
    }
}
