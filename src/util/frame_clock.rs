use serde::Serialize;
use web_time::{Duration, Instant};

/// Timing for one engine update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameTick {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Zero-based frame counter.
    pub frame: u64,
}

impl FrameTick {
    /// Tick for frame `frame` of a fixed-step simulation at `dt` seconds
    /// per frame. Used by headless runs and tests.
    #[must_use]
    pub fn fixed(frame: u64, dt: f32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let elapsed = frame as f32 * dt;
        Self {
            elapsed,
            delta: dt,
            frame,
        }
    }
}

/// Wall-clock frame timer with smoothed FPS.
pub struct FrameClock {
    /// Clock start.
    start: Instant,
    /// Last frame timestamp
    last_frame: Instant,
    /// Frames ticked so far.
    frame: u64,
    /// Upper bound on a single delta, so a stalled tab doesn't teleport
    /// vehicles.
    max_delta: Duration,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameClock {
    /// Start a clock now. Deltas are capped at `max_delta`.
    #[must_use]
    pub fn new(max_delta: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            frame: 0,
            max_delta,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Advance to now and return the tick for this frame.
    pub fn tick(&mut self) -> FrameTick {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).min(self.max_delta);
        self.last_frame = now;

        let frame_time = delta.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        let tick = FrameTick {
            elapsed: now.duration_since(self.start).as_secs_f32(),
            delta: frame_time,
            frame: self.frame,
        };
        self.frame += 1;
        tick
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
