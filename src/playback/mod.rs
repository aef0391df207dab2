//! Playback cursor — transport orchestration and the canonical current beat.
//!
//! The [`PlaybackController`] owns the [`AudioTransport`] and is the only
//! thing that moves it. Every view reads the cursor from the
//! [`PlaybackFrame`] returned by [`PlaybackController::tick`], sampled once
//! per frame.

pub mod song;
pub mod throttle;
pub mod window_lock;

pub use song::Song;
pub use throttle::Throttle;
pub use window_lock::WindowLock;

use crate::audio::{AudioEngine, AudioError, AudioTransport};
use crate::beatmap::View;
use crate::config::EditorConfig;
use crate::space::ZoomLevel;
use crate::time::{clamp, step_on_grid, Direction, SnapIncrement};
use crate::visible::{EventZoom, GraphicsLevel};

/// Slowest allowed playback rate.
pub const MIN_PLAYBACK_RATE: f64 = 0.25;
/// Fastest allowed playback rate.
pub const MAX_PLAYBACK_RATE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    /// Position follows the pointer on a scrub surface.
    Scrubbing,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Stopped => "stopped",
            PlaybackState::Playing => "playing",
            PlaybackState::Scrubbing => "scrubbing",
        }
    }
}

/// One cursor sample. Everything drawn in a frame derives from this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackFrame {
    pub time_ms: f64,
    pub beat: f64,
    pub duration_ms: f64,
    pub state: PlaybackState,
    pub playback_rate: f64,
}

/// Play/pause/seek/scroll/scrub over one transport.
pub struct PlaybackController<E: AudioEngine> {
    transport: AudioTransport<E>,
    song: Song,
    state: PlaybackState,
    view: View,
    snap: SnapIncrement,
    zoom: ZoomLevel,
    event_zoom: EventZoom,
    graphics: GraphicsLevel,
    scroll: Throttle<Direction>,
    window_lock: WindowLock,
}

impl<E: AudioEngine> PlaybackController<E> {
    /// Wrap `transport` with the timing of `song` and the preferences in `config`.
    ///
    /// The config's playback rate and volume are applied to the transport.
    pub fn new(
        mut transport: AudioTransport<E>,
        song: Song,
        config: &EditorConfig,
    ) -> Result<Self, AudioError> {
        transport.change_playback_rate(clamp(
            config.playback_rate,
            MIN_PLAYBACK_RATE,
            MAX_PLAYBACK_RATE,
        ))?;
        transport.set_gain(config.volume)?;
        Ok(Self {
            transport,
            song,
            state: PlaybackState::Stopped,
            view: View::Notes,
            snap: config.snap,
            zoom: ZoomLevel::from_index(config.zoom),
            event_zoom: EventZoom::from_index(config.event_zoom),
            graphics: config.graphics,
            scroll: Throttle::new(config.scroll_throttle_ms as f64),
            window_lock: WindowLock::new(config.window_lock, config.window_lock_liveness_ms as f64),
        })
    }

    // --- cursor ---

    pub fn current_time_ms(&self) -> f64 {
        self.transport.current_time()
    }

    pub fn current_beat(&self) -> f64 {
        self.song.beat_at(self.transport.current_time())
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn duration_ms(&self) -> f64 {
        self.transport.duration_ms()
    }

    /// Sample the cursor for this frame.
    ///
    /// Flushes coalesced scroll input, stops at the end of the track and
    /// applies the window-lock correction, in that order.
    pub fn tick(&mut self, now_ms: f64) -> Result<PlaybackFrame, AudioError> {
        if let Some(direction) = self.scroll.flush(now_ms) {
            self.apply_scroll(direction)?;
        }

        if self.state == PlaybackState::Playing {
            let duration = self.transport.duration_ms();
            if self.transport.current_time() >= duration {
                self.transport.pause()?;
                self.transport.seek(duration)?;
                self.state = PlaybackState::Stopped;
                self.window_lock.reset();
                tracing::debug!(duration_ms = duration, "end of track");
            }
        }

        if self.state == PlaybackState::Playing && self.view == View::Events {
            let beat = self.current_beat();
            let window = self.event_zoom.beats_per_window();
            if let Some(boundary) = self.window_lock.observe(now_ms, beat, window) {
                tracing::debug!(from = beat, to = boundary, "window lock");
                self.transport.seek(self.song.ms_at(boundary))?;
            }
        } else {
            self.window_lock.reset();
        }

        let time_ms = self.transport.current_time();
        Ok(PlaybackFrame {
            time_ms,
            beat: self.song.beat_at(time_ms),
            duration_ms: self.transport.duration_ms(),
            state: self.state,
            playback_rate: self.transport.playback_rate(),
        })
    }

    // --- transport ---

    /// Start playback. Commits an active scrub first; at the end of the
    /// track playback restarts from 0.
    pub fn play(&mut self) -> Result<(), AudioError> {
        match self.state {
            PlaybackState::Playing => return Ok(()),
            PlaybackState::Scrubbing => self.end_scrub(),
            PlaybackState::Stopped => {}
        }
        let duration = self.transport.duration_ms();
        if duration > 0.0 && self.transport.current_time() >= duration {
            self.transport.seek(0.0)?;
        }
        self.transport.play()?;
        if self.transport.is_playing() {
            self.state = PlaybackState::Playing;
        }
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), AudioError> {
        self.transport.pause()?;
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Stopped;
        }
        Ok(())
    }

    pub fn toggle_playback(&mut self) -> Result<(), AudioError> {
        if self.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Stop playback or scrubbing, keeping the position.
    pub fn stop(&mut self) -> Result<(), AudioError> {
        self.transport.pause()?;
        self.state = PlaybackState::Stopped;
        Ok(())
    }

    /// Seek to an audio time. Out-of-range targets are clamped.
    pub fn seek_ms(&mut self, ms: f64) -> Result<(), AudioError> {
        self.window_lock.reset();
        self.transport.seek(ms)
    }

    pub fn seek_beat(&mut self, beat: f64) -> Result<(), AudioError> {
        self.seek_ms(self.song.ms_at(beat))
    }

    pub fn skip_to_start(&mut self) -> Result<(), AudioError> {
        self.stop()?;
        self.seek_ms(0.0)
    }

    pub fn skip_to_end(&mut self) -> Result<(), AudioError> {
        self.stop()?;
        self.seek_ms(self.transport.duration_ms())
    }

    /// Beats moved by one seek step: the snap increment in the notes view,
    /// one window in the events view.
    pub fn seek_increment(&self) -> f64 {
        match self.view {
            View::Notes => self.snap.beats(),
            View::Events => self.event_zoom.beats_per_window(),
        }
    }

    pub fn seek_forwards(&mut self) -> Result<(), AudioError> {
        self.seek_step(Direction::Forwards)
    }

    pub fn seek_backwards(&mut self) -> Result<(), AudioError> {
        self.seek_step(Direction::Backwards)
    }

    fn seek_step(&mut self, direction: Direction) -> Result<(), AudioError> {
        let target = step_on_grid(self.current_beat(), self.seek_increment(), direction);
        self.seek_beat(target)
    }

    /// Scroll by one snap step. Input faster than the throttle interval is
    /// coalesced and applied on a later [`tick`](Self::tick).
    pub fn scroll_through_song(
        &mut self,
        now_ms: f64,
        direction: Direction,
    ) -> Result<(), AudioError> {
        match self.scroll.offer(now_ms, direction) {
            Some(direction) => self.apply_scroll(direction),
            None => Ok(()),
        }
    }

    fn apply_scroll(&mut self, direction: Direction) -> Result<(), AudioError> {
        let target = step_on_grid(self.current_beat(), self.snap.beats(), direction);
        self.seek_beat(target)
    }

    /// Pointer pressed on a scrub surface at audio time `ms`.
    pub fn begin_scrub(&mut self, ms: f64) -> Result<(), AudioError> {
        self.transport.pause()?;
        self.state = PlaybackState::Scrubbing;
        self.seek_ms(ms)
    }

    /// Pointer dragged on a scrub surface. Ignored unless scrubbing.
    pub fn scrub_to(&mut self, ms: f64) -> Result<(), AudioError> {
        if self.state != PlaybackState::Scrubbing {
            return Ok(());
        }
        self.seek_ms(ms)
    }

    /// Pointer released. The scrubbed position stays as the new offset.
    pub fn end_scrub(&mut self) {
        if self.state == PlaybackState::Scrubbing {
            self.state = PlaybackState::Stopped;
            tracing::debug!(position_ms = self.transport.current_time(), "scrub committed");
        }
    }

    /// Set the playback rate, clamped to `[MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE]`.
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), AudioError> {
        self.transport
            .change_playback_rate(clamp(rate, MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE))
    }

    pub fn playback_rate(&self) -> f64 {
        self.transport.playback_rate()
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<(), AudioError> {
        self.transport.set_gain(volume)
    }

    // --- view state ---

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.window_lock.reset();
    }

    pub fn snap(&self) -> SnapIncrement {
        self.snap
    }

    pub fn set_snap(&mut self, snap: SnapIncrement) {
        self.snap = snap;
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
    }

    pub fn event_zoom(&self) -> EventZoom {
        self.event_zoom
    }

    pub fn set_event_zoom(&mut self, zoom: EventZoom) {
        self.event_zoom = zoom;
        self.window_lock.reset();
    }

    pub fn graphics(&self) -> GraphicsLevel {
        self.graphics
    }

    pub fn set_graphics(&mut self, graphics: GraphicsLevel) {
        self.graphics = graphics;
    }

    pub fn window_lock_enabled(&self) -> bool {
        self.window_lock.is_enabled()
    }

    pub fn set_window_lock(&mut self, enabled: bool) {
        self.window_lock.set_enabled(enabled);
    }

    pub fn song(&self) -> Song {
        self.song
    }

    pub fn transport(&self) -> &AudioTransport<E> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut AudioTransport<E> {
        &mut self.transport
    }
}
