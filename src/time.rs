//! Frame counting and FPS measurement for the window host.

use std::time::{Duration, Instant};

/// Counts frames and measures frames per second over a sliding window.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    /// Total frames since start.
    frame_count: u64,
    /// FPS measured over the last completed window.
    fps: f32,
    /// Frame count when the current window began.
    window_frame_count: u64,
    /// When the current window began.
    window_start: Instant,
    /// Length of the measurement window.
    interval: Duration,
}

impl FrameClock {
    /// Measure FPS every 500 ms.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// Measure FPS every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            frame_count: 0,
            fps: 0.0,
            window_frame_count: 0,
            window_start: now,
            interval,
        }
    }

    /// Count a frame. Returns `true` when a new FPS value was measured.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        self.frame_count += 1;

        let window = now.duration_since(self.window_start);
        if window < self.interval || window.is_zero() {
            return false;
        }

        let frames = self.frame_count - self.window_frame_count;
        self.fps = frames as f32 / window.as_secs_f32();
        self.window_frame_count = self.frame_count;
        self.window_start = now;
        true
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Time since the clock was created.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
