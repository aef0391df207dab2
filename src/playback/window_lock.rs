//! Window lock — pull playback onto a window boundary the moment the cursor crosses it.

use crate::visible::window_start;

#[derive(Debug, Clone, Copy)]
struct Sample {
    wall_ms: f64,
    beat: f64,
}

/// Tracks the previous frame's cursor sample and reports boundary crossings.
#[derive(Debug, Clone)]
pub struct WindowLock {
    enabled: bool,
    liveness_ms: f64,
    last: Option<Sample>,
}

impl WindowLock {
    pub fn new(enabled: bool, liveness_ms: f64) -> Self {
        Self {
            enabled,
            liveness_ms,
            last: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.last = None;
    }

    /// Forget the previous sample, e.g. after a seek or pause.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Record this frame's sample. Returns the beat to seek to when the
    /// cursor moved forward into a new window since the previous frame and
    /// the frames were less than the liveness threshold apart.
    pub fn observe(&mut self, wall_ms: f64, beat: f64, beats_per_window: f64) -> Option<f64> {
        let prev = self.last.replace(Sample { wall_ms, beat });
        if !self.enabled {
            return None;
        }
        let prev = prev?;
        if beat <= prev.beat {
            return None;
        }

        let entered = window_start(beat, beats_per_window);
        if entered <= window_start(prev.beat, beats_per_window) {
            return None;
        }
        if wall_ms - prev.wall_ms >= self.liveness_ms {
            tracing::trace!(gap_ms = wall_ms - prev.wall_ms, "window lock skipped after stall");
            return None;
        }
        Some(entered)
    }
}
