//! Audio transport — play/pause/seek/rate over an engine whose clock only moves forward.
//!
//! The [`AudioTransport`] owns the logical playback position. It talks to an
//! [`AudioEngine`] primitive that can start and stop playback
//! units and report a monotonic clock; the transport never reads position from
//! the engine, it derives it from that clock and its own anchors.
//!
//! Two engines ship with the crate: [`CpalEngine`] drives the default output
//! device through a lock-free command queue, [`HeadlessEngine`] has a clock
//! advanced by the caller and keeps every transport behaviour testable without
//! audio hardware.

pub mod blob;
pub mod callback;
pub mod clip;
pub mod command;
pub mod headless;
pub mod output;
pub mod transport;

use std::sync::Arc;

pub use blob::{BlobStore, DirectoryStore};
pub use clip::AudioClip;
pub use command::EngineCommand;
pub use headless::{HeadlessEngine, HeadlessSource};
pub use output::CpalEngine;
pub use transport::AudioTransport;

/// Audio errors. Only [`AudioError::Decode`] and [`AudioError::Empty`] reach
/// the user during normal editing; device errors surface at start-up.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// The bytes are not audio the decoder understands.
    #[error("could not decode audio: {0}")]
    Decode(#[from] hound::Error),
    /// The file decoded but holds no samples.
    #[error("audio file contains no samples")]
    Empty,
    /// The header declares a sample rate of 0 Hz, so the length is undefined.
    #[error("audio file declares a sample rate of 0 Hz")]
    ZeroSampleRate,
    /// The blob store could not produce the file.
    #[error("failed to read '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// No audio output device found.
    #[error("no audio output device found")]
    NoOutputDevice,
    /// Failed to query device configuration.
    #[error("device config error: {0}")]
    DeviceConfig(String),
    /// Failed to build the audio stream.
    #[error("stream build error: {0}")]
    StreamBuild(String),
    /// Failed to start the audio stream.
    #[error("stream play error: {0}")]
    StreamPlay(String),
    /// Command ring buffer is full; the audio thread is not draining it.
    #[error("audio command ring buffer is full")]
    BufferFull,
}

/// Handle to one playback unit started on an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u64);

/// The low-level playback primitive the transport is built on.
///
/// A source plays one clip from an offset at a rate until it is stopped or
/// runs out. Sources cannot be paused or rewound; the transport stops one and
/// starts another instead.
pub trait AudioEngine {
    /// Engine clock in milliseconds. Never decreases.
    fn now_ms(&self) -> f64;

    /// Create, connect and start a new playback unit.
    fn start_source(
        &mut self,
        clip: Arc<AudioClip>,
        offset_ms: f64,
        rate: f64,
    ) -> Result<SourceId, AudioError>;

    /// Stop a playback unit. Unknown ids are ignored.
    fn stop_source(&mut self, id: SourceId) -> Result<(), AudioError>;

    /// Change the playback rate of a running unit.
    fn set_source_rate(&mut self, id: SourceId, rate: f64) -> Result<(), AudioError>;

    /// Set the output gain (`0.0..=1.0`).
    fn set_gain(&mut self, gain: f32) -> Result<(), AudioError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_error_display() {
        assert_eq!(
            AudioError::NoOutputDevice.to_string(),
            "no audio output device found"
        );
        assert_eq!(
            AudioError::BufferFull.to_string(),
            "audio command ring buffer is full"
        );
        assert_eq!(
            AudioError::DeviceConfig("test".to_string()).to_string(),
            "device config error: test"
        );
        assert_eq!(AudioError::Empty.to_string(), "audio file contains no samples");
    }

    #[test]
    fn read_error_names_file() {
        let err = AudioError::Read {
            name: "song.wav".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "failed to read 'song.wav': missing");
    }
}
