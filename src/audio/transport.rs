//! Logical playback position over a forward-only engine clock.
//!
//! Position is never accumulated. While playing it is derived from
//! `(now - start_time) * rate`; while paused it is `start_offset`.

use std::sync::Arc;

use super::blob::BlobStore;
use super::{AudioClip, AudioEngine, AudioError, SourceId};
use crate::time::clamp;

/// Play/pause/seek/rate control for one loaded clip.
#[derive(Debug)]
pub struct AudioTransport<E: AudioEngine> {
    engine: E,
    clip: Option<Arc<AudioClip>>,
    source: Option<SourceId>,
    gain: f32,
    playback_rate: f64,
    /// Engine time that corresponds to logical position 0 at the current rate.
    start_time: f64,
    /// Logical position at the last pause or seek.
    start_offset: f64,
    is_playing: bool,
}

impl<E: AudioEngine> AudioTransport<E> {
    /// Create an empty transport. Nothing plays until a clip is loaded.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            clip: None,
            source: None,
            gain: 1.0,
            playback_rate: 1.0,
            start_time: 0.0,
            start_offset: 0.0,
            is_playing: false,
        }
    }

    /// Decode `bytes` and make them the current clip. Returns the duration in ms.
    ///
    /// Decode failures are returned as-is; the previous clip stays loaded.
    pub fn load(&mut self, bytes: &[u8]) -> Result<f64, AudioError> {
        let clip = AudioClip::decode(bytes)?;
        self.load_clip(Arc::new(clip))
    }

    /// Read `name` from `store`, then [`load`](Self::load) it.
    pub fn load_from<B: BlobStore + ?Sized>(
        &mut self,
        store: &B,
        name: &str,
    ) -> Result<f64, AudioError> {
        let bytes = store.read(name).map_err(|source| AudioError::Read {
            name: name.to_string(),
            source,
        })?;
        self.load(&bytes)
    }

    /// Replace the current clip with an already decoded one. Position resets to 0.
    pub fn load_clip(&mut self, clip: Arc<AudioClip>) -> Result<f64, AudioError> {
        self.pause()?;
        let duration = clip.duration_ms();
        self.clip = Some(clip);
        self.start_offset = 0.0;
        tracing::debug!(duration_ms = duration, "audio loaded");
        Ok(duration)
    }

    /// Start playing from the current offset.
    ///
    /// Without a loaded clip this logs a warning and does nothing. Calling it
    /// while already playing does nothing.
    pub fn play(&mut self) -> Result<(), AudioError> {
        let Some(clip) = self.clip.clone() else {
            tracing::warn!("play requested before audio was loaded");
            return Ok(());
        };
        if self.is_playing {
            return Ok(());
        }

        let now = self.engine.now_ms();
        self.start_time = now - self.start_offset / self.playback_rate;
        let id = self
            .engine
            .start_source(clip, self.start_offset, self.playback_rate)?;
        self.source = Some(id);
        self.is_playing = true;
        tracing::debug!(offset_ms = self.start_offset, rate = self.playback_rate, "play");
        Ok(())
    }

    /// Stop playing and keep the position. No-op when already paused.
    pub fn pause(&mut self) -> Result<(), AudioError> {
        if !self.is_playing {
            return Ok(());
        }
        self.start_offset = self.current_time();
        self.is_playing = false;
        if let Some(id) = self.source.take() {
            self.engine.stop_source(id)?;
        }
        tracing::debug!(offset_ms = self.start_offset, "pause");
        Ok(())
    }

    /// Jump to `ms`, clamped into `[0, duration]`.
    ///
    /// While playing the current unit is stopped and a new one started at the
    /// target, so the audible position follows immediately.
    pub fn seek(&mut self, ms: f64) -> Result<(), AudioError> {
        let target = clamp(ms, 0.0, self.duration_ms());
        if target != ms {
            tracing::debug!(requested_ms = ms, clamped_ms = target, "seek target clamped");
        }

        if self.is_playing {
            self.pause()?;
            self.start_offset = target;
            self.play()
        } else {
            self.start_offset = target;
            Ok(())
        }
    }

    /// Change the playback rate without moving the logical position.
    ///
    /// `start_time` is re-anchored so that [`current_time`](Self::current_time)
    /// reads the same value immediately before and after the change. Rates
    /// that are not positive and finite are ignored with a warning.
    pub fn change_playback_rate(&mut self, rate: f64) -> Result<(), AudioError> {
        if !(rate.is_finite() && rate > 0.0) {
            tracing::warn!(rate, "ignoring non-positive playback rate");
            return Ok(());
        }
        if self.is_playing {
            let current = self.current_time();
            let now = self.engine.now_ms();
            self.playback_rate = rate;
            self.start_time = now - current / rate;
            if let Some(id) = self.source {
                self.engine.set_source_rate(id, rate)?;
            }
        } else {
            self.playback_rate = rate;
        }
        tracing::debug!(rate, "playback rate changed");
        Ok(())
    }

    /// Logical position in milliseconds, within `[0, duration]`.
    pub fn current_time(&self) -> f64 {
        if self.is_playing {
            let elapsed = (self.engine.now_ms() - self.start_time) * self.playback_rate;
            clamp(elapsed, 0.0, self.duration_ms())
        } else {
            self.start_offset
        }
    }

    /// Set output gain, clamped to `[0, 1]`.
    pub fn set_gain(&mut self, gain: f32) -> Result<(), AudioError> {
        self.gain = gain.clamp(0.0, 1.0);
        self.engine.set_gain(self.gain)
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Length of the loaded clip, or 0 when nothing is loaded.
    pub fn duration_ms(&self) -> f64 {
        self.clip.as_ref().map_or(0.0, |c| c.duration_ms())
    }

    pub fn is_loaded(&self) -> bool {
        self.clip.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn clip(&self) -> Option<&Arc<AudioClip>> {
        self.clip.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
