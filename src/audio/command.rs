//! Commands sent from the main thread to the audio thread via ring buffer.

use std::sync::Arc;

use super::{AudioClip, SourceId};

/// Commands sent from the main thread to the audio thread via ring buffer.
#[derive(Debug)]
pub enum EngineCommand {
    /// Start a new playback unit for `clip` at `offset_ms` (clip time).
    Start {
        id: SourceId,
        clip: Arc<AudioClip>,
        offset_ms: f64,
        rate: f64,
    },

    /// Stop and discard a playback unit.
    Stop(SourceId),

    /// Change the rate of a running unit.
    SetRate(SourceId, f64),

    /// Set master gain (0.0 to 1.0).
    SetGain(f32),
}
