//! Decoded audio — WAV decoding and interpolated frame reads.

use std::io::Cursor;

use super::AudioError;

/// A decoded, interleaved audio buffer at its native sample rate.
#[derive(Debug, Clone)]
pub struct AudioClip {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl AudioClip {
    /// Wrap already-decoded interleaved samples. Zero channels or a zero
    /// sample rate are raised to 1.
    pub fn from_interleaved(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: channels.max(1),
            sample_rate: sample_rate.max(1),
        }
    }

    /// Decode WAV bytes.
    ///
    /// Supports integer PCM at any bit depth hound reads and 32-bit float.
    /// Channel layout and sample rate are kept as-is; the output engine
    /// resamples on the fly.
    pub fn decode(bytes: &[u8]) -> Result<Self, AudioError> {
        let wav = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = wav.spec();
        if spec.sample_rate == 0 {
            return Err(AudioError::ZeroSampleRate);
        }

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max_val = (1u64 << (spec.bits_per_sample - 1)) as f32;
                wav.into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<Result<Vec<f32>, _>>()?
            }
            hound::SampleFormat::Float => {
                wav.into_samples::<f32>().collect::<Result<Vec<f32>, _>>()?
            }
        };

        if samples.is_empty() {
            return Err(AudioError::Empty);
        }

        Ok(Self::from_interleaved(
            samples,
            spec.channels,
            spec.sample_rate,
        ))
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Length in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64 * 1000.0
    }

    /// Native sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Left/right pair for a whole frame. Mono is duplicated, extra channels dropped.
    fn stereo_frame(&self, frame: usize) -> (f32, f32) {
        let base = frame * self.channels as usize;
        let left = self.samples[base];
        let right = if self.channels > 1 {
            self.samples[base + 1]
        } else {
            left
        };
        (left, right)
    }

    /// Linearly interpolated left/right pair at a fractional frame position.
    ///
    /// Returns `None` once `position` is past the last frame.
    pub fn stereo_at(&self, position: f64) -> Option<(f32, f32)> {
        if position < 0.0 {
            return None;
        }
        let frames = self.frames();
        let index = position.floor() as usize;
        if index >= frames {
            return None;
        }
        let frac = (position - index as f64) as f32;
        let (l0, r0) = self.stereo_frame(index);
        let (l1, r1) = if index + 1 < frames {
            self.stereo_frame(index + 1)
        } else {
            (l0, r0)
        };
        Some((l0 + (l1 - l0) * frac, r0 + (r1 - r0) * frac))
    }
}
