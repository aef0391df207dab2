//! Audio callback — runs on the cpal audio thread.
//!
//! Drains commands from the ring buffer, mixes every running source into the
//! output with rate-aware resampling, applies gain and a hard ceiling, and
//! advances the frame counter that serves as the engine clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ringbuf::traits::Consumer;
use ringbuf::HeapCons;

use super::command::EngineCommand;
use super::{AudioClip, SourceId};

/// Output is hard-clamped to `[-CEILING, CEILING]`.
const CEILING: f32 = 0.95;

/// One running playback unit.
struct Voice {
    id: SourceId,
    clip: Arc<AudioClip>,
    /// Read position in clip frames.
    position: f64,
    /// Clip frames advanced per output frame.
    step: f64,
}

/// State that lives on the audio thread. Accessed only from the cpal callback.
pub struct MixCallback {
    consumer: HeapCons<EngineCommand>,
    voices: Vec<Voice>,
    gain: f32,
    channels: u16,
    sample_rate: u32,
    frames_rendered: Arc<AtomicU64>,
}

impl MixCallback {
    /// Create a callback reading commands from `consumer` and counting frames into `frames_rendered`.
    pub fn new(
        consumer: HeapCons<EngineCommand>,
        channels: u16,
        sample_rate: u32,
        frames_rendered: Arc<AtomicU64>,
    ) -> Self {
        Self {
            consumer,
            voices: Vec::with_capacity(4),
            gain: 1.0,
            channels: channels.max(1),
            sample_rate,
            frames_rendered,
        }
    }

    fn step_for(&self, clip: &AudioClip, rate: f64) -> f64 {
        rate * clip.sample_rate() as f64 / self.sample_rate as f64
    }

    fn apply(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::Start {
                id,
                clip,
                offset_ms,
                rate,
            } => {
                let position = offset_ms / 1000.0 * clip.sample_rate() as f64;
                let step = self.step_for(&clip, rate);
                self.voices.push(Voice {
                    id,
                    clip,
                    position,
                    step,
                });
            }
            EngineCommand::Stop(id) => {
                self.voices.retain(|v| v.id != id);
            }
            EngineCommand::SetRate(id, rate) => {
                let sample_rate = self.sample_rate as f64;
                if let Some(voice) = self.voices.iter_mut().find(|v| v.id == id) {
                    voice.step = rate * voice.clip.sample_rate() as f64 / sample_rate;
                }
            }
            EngineCommand::SetGain(g) => {
                self.gain = g.clamp(0.0, 1.0);
            }
        }
    }

    /// Called by cpal for each output buffer. Fills `output` with interleaved samples.
    pub fn process(&mut self, output: &mut [f32]) {
        while let Some(cmd) = self.consumer.try_pop() {
            self.apply(cmd);
        }

        output.fill(0.0);

        let channels = self.channels as usize;
        for frame in output.chunks_mut(channels) {
            for voice in self.voices.iter_mut() {
                let Some((left, right)) = voice.clip.stereo_at(voice.position) else {
                    continue;
                };
                if channels == 1 {
                    frame[0] += (left + right) * 0.5;
                } else {
                    frame[0] += left;
                    frame[1] += right;
                }
                voice.position += voice.step;
            }
        }

        // Drop voices that have run off the end of their clip.
        self.voices.retain(|v| v.position < v.clip.frames() as f64);

        let gain = self.gain;
        for sample in output.iter_mut() {
            *sample = (*sample * gain).clamp(-CEILING, CEILING);
        }

        let frames = (output.len() / channels) as u64;
        self.frames_rendered.fetch_add(frames, Ordering::Relaxed);
    }

    /// Number of running voices.
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Returns the sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}
