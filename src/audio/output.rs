//! Output engine — cpal stream on the default device, fed through a lock-free queue.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{
    traits::{Producer, Split},
    HeapRb,
};

use super::callback::MixCallback;
use super::command::EngineCommand;
use super::{AudioClip, AudioEngine, AudioError, SourceId};

/// Ring buffer capacity (number of commands).
const RING_BUFFER_CAPACITY: usize = 256;

/// Plays sources on the default output device.
///
/// The stream runs from construction onwards and renders silence when no
/// source is active, so the frame counter behind [`AudioEngine::now_ms`]
/// keeps moving forward for the whole session.
pub struct CpalEngine {
    // Held so the stream keeps running; dropping it stops output.
    _stream: cpal::Stream,
    producer: ringbuf::HeapProd<EngineCommand>,
    frames_rendered: Arc<AtomicU64>,
    sample_rate: u32,
    channels: u16,
    next_id: u64,
}

impl CpalEngine {
    /// Create and start the engine on the default output device.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        Self::build_with_device(&device, sample_rate, channels)
    }

    fn build_with_device(
        device: &cpal::Device,
        sample_rate: u32,
        channels: u16,
    ) -> Result<Self, AudioError> {
        let rb = HeapRb::<EngineCommand>::new(RING_BUFFER_CAPACITY);
        let (producer, consumer) = rb.split();

        let frames_rendered = Arc::new(AtomicU64::new(0));
        let mut mix = MixCallback::new(
            consumer,
            channels,
            sample_rate,
            Arc::clone(&frames_rendered),
        );

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_fn = |err: cpal::StreamError| {
            tracing::error!(%err, "audio stream error");
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    mix.process(data);
                },
                err_fn,
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

        tracing::info!(sample_rate, channels, "audio output started");

        Ok(Self {
            _stream: stream,
            producer,
            frames_rendered,
            sample_rate,
            channels,
            next_id: 0,
        })
    }

    fn send(&mut self, cmd: EngineCommand) -> Result<(), AudioError> {
        self.producer
            .try_push(cmd)
            .map_err(|_| AudioError::BufferFull)
    }

    /// Device sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Device channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}

impl AudioEngine for CpalEngine {
    fn now_ms(&self) -> f64 {
        self.frames_rendered.load(Ordering::Relaxed) as f64 / self.sample_rate as f64 * 1000.0
    }

    fn start_source(
        &mut self,
        clip: Arc<AudioClip>,
        offset_ms: f64,
        rate: f64,
    ) -> Result<SourceId, AudioError> {
        let id = SourceId(self.next_id);
        self.next_id += 1;
        self.send(EngineCommand::Start {
            id,
            clip,
            offset_ms,
            rate,
        })?;
        Ok(id)
    }

    fn stop_source(&mut self, id: SourceId) -> Result<(), AudioError> {
        self.send(EngineCommand::Stop(id))
    }

    fn set_source_rate(&mut self, id: SourceId, rate: f64) -> Result<(), AudioError> {
        self.send(EngineCommand::SetRate(id, rate))
    }

    fn set_gain(&mut self, gain: f32) -> Result<(), AudioError> {
        self.send(EngineCommand::SetGain(gain))
    }
}
