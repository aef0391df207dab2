//! Headless engine — a caller-driven clock that records what it was asked to play.

use std::sync::Arc;

use super::{AudioClip, AudioEngine, AudioError, SourceId};

/// A playback unit started on a [`HeadlessEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSource {
    pub id: SourceId,
    pub offset_ms: f64,
    pub rate: f64,
    /// Engine clock at the moment the source started.
    pub started_at_ms: f64,
}

/// An engine with no device behind it.
///
/// The clock moves only when [`HeadlessEngine::advance`] is called, which makes
/// transport arithmetic exactly reproducible.
#[derive(Debug, Clone)]
pub struct HeadlessEngine {
    now_ms: f64,
    next_id: u64,
    active: Vec<HeadlessSource>,
    started: usize,
    gain: f32,
}

impl HeadlessEngine {
    /// Create an engine with its clock at zero.
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 0,
            active: Vec::new(),
            started: 0,
            gain: 1.0,
        }
    }

    /// Move the clock forward. Negative amounts are ignored.
    pub fn advance(&mut self, ms: f64) {
        if ms > 0.0 {
            self.now_ms += ms;
        }
    }

    /// Sources that have been started and not stopped.
    pub fn active_sources(&self) -> &[HeadlessSource] {
        &self.active
    }

    /// Total number of sources ever started.
    pub fn started_count(&self) -> usize {
        self.started
    }

    /// Last gain set.
    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEngine for HeadlessEngine {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn start_source(
        &mut self,
        _clip: Arc<AudioClip>,
        offset_ms: f64,
        rate: f64,
    ) -> Result<SourceId, AudioError> {
        let id = SourceId(self.next_id);
        self.next_id += 1;
        self.started += 1;
        self.active.push(HeadlessSource {
            id,
            offset_ms,
            rate,
            started_at_ms: self.now_ms,
        });
        Ok(id)
    }

    fn stop_source(&mut self, id: SourceId) -> Result<(), AudioError> {
        self.active.retain(|s| s.id != id);
        Ok(())
    }

    fn set_source_rate(&mut self, id: SourceId, rate: f64) -> Result<(), AudioError> {
        if let Some(source) = self.active.iter_mut().find(|s| s.id == id) {
            source.rate = rate;
        }
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) -> Result<(), AudioError> {
        self.gain = gain;
        Ok(())
    }
}
