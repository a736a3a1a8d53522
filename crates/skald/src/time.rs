//! Frame timing.
//!
//! The [`Time`] resource is advanced explicitly by whoever drives the frame
//! loop, so tests and headless hosts can step the simulation at any rate.

use std::time::Duration;

/// Frame timing resource.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    /// Unscaled duration of the last step.
    raw_delta: Duration,
    /// Scaled duration of the last step.
    delta: Duration,
    /// Sum of scaled deltas.
    elapsed: Duration,
    frame_count: u64,
    /// Multiplier applied to every incoming delta.
    scale: f32,
}

impl Time {
    pub fn new() -> Self {
        Self {
            raw_delta: Duration::ZERO,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            scale: 1.0,
        }
    }

    /// Step the clock by `dt` seconds of wall time. Returns the scaled delta
    /// in seconds, which is what systems should see. Negative or non-finite
    /// input counts as zero.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.raw_delta = Duration::try_from_secs_f32(dt).unwrap_or(Duration::MAX);
        self.delta = Duration::try_from_secs_f32(dt * self.scale).unwrap_or(Duration::MAX);
        self.elapsed = self.elapsed.saturating_add(self.delta);
        self.frame_count += 1;
        self.delta.as_secs_f32()
    }

    /// Negative scales clamp to zero. A non-finite scale is rejected and
    /// resets to 1.0.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_finite() {
            scale.max(0.0)
        } else {
            log::warn!("Ignoring non-finite time scale {scale}; using 1.0");
            1.0
        };
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Scaled duration of the last step.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Scaled delta in seconds (f32), the most common way to use it.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn raw_delta_secs(&self) -> f32 {
        self.raw_delta.as_secs_f32()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Estimated FPS based on the last unscaled delta.
    pub fn fps(&self) -> f32 {
        let secs = self.raw_delta.as_secs_f32();
        if secs > 0.0 { 1.0 / secs } else { 0.0 }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
