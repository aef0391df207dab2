//! Song timing — tempo and the offset between audio start and beat 0.

use crate::time::{beats_to_ms, ms_to_beats};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Song {
    pub bpm: f64,
    /// Audio time at which beat 0 falls.
    pub offset_ms: f64,
}

impl Song {
    pub fn new(bpm: f64, offset_ms: f64) -> Self {
        Self { bpm, offset_ms }
    }

    /// Beat at audio time `ms`. Pure function of its input, so it never drifts.
    pub fn beat_at(&self, ms: f64) -> f64 {
        ms_to_beats(ms - self.offset_ms, self.bpm)
    }

    /// Audio time of `beat`.
    pub fn ms_at(&self, beat: f64) -> f64 {
        beats_to_ms(beat, self.bpm) + self.offset_ms
    }
}
