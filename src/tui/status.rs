//! Status bar — position, transport state, and the active editing settings.

use crate::beatmap::View;
use crate::playback::PlaybackState;
use crate::selection::SelectionMode;
use crate::time::{format_beat, format_time, SnapIncrement};
use crate::visible::GraphicsLevel;

/// Status information for the TUI status bar.
#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub time_ms: f64,
    pub duration_ms: f64,
    pub beat: f64,
    pub state: PlaybackState,
    pub playback_rate: f64,
    pub snap: SnapIncrement,
    pub view: View,
    /// Beat depth in the notes view, beats per window in the events view.
    pub zoom: f64,
    pub graphics: GraphicsLevel,
    pub window_lock: bool,
    pub selection_mode: SelectionMode,
}

impl StatusInfo {
    /// `"MM:SS / MM:SS"`.
    pub fn time_display(&self) -> String {
        format!("{} / {}", format_time(self.time_ms), format_time(self.duration_ms))
    }

    /// `"beat N.NNN"`.
    pub fn beat_display(&self) -> String {
        format!("beat {}", format_beat(self.beat))
    }

    pub fn playback_display(&self) -> &str {
        match self.state {
            PlaybackState::Playing => "PLAY",
            PlaybackState::Stopped => "STOP",
            PlaybackState::Scrubbing => "SCRUB",
        }
    }

    pub fn rate_display(&self) -> String {
        format!("{:.2}x", self.playback_rate)
    }

    pub fn zoom_display(&self) -> String {
        match self.view {
            View::Notes => format!("{}u/beat", self.zoom),
            View::Events => format!("{} beats", self.zoom),
        }
    }

    /// Everything after the playback indicator, separated by `|`.
    pub fn settings_display(&self) -> String {
        let mut parts = vec![
            self.time_display(),
            self.beat_display(),
            self.rate_display(),
            format!("snap {}", self.snap.label()),
            self.zoom_display(),
            self.view.label().to_string(),
            self.graphics.label().to_string(),
        ];
        if self.window_lock {
            parts.push("lock".to_string());
        }
        if self.selection_mode != SelectionMode::None {
            parts.push(self.selection_mode.label().to_string());
        }
        parts.join(" | ")
    }
}

impl Default for StatusInfo {
    fn default() -> Self {
        Self {
            time_ms: 0.0,
            duration_ms: 0.0,
            beat: 0.0,
            state: PlaybackState::Stopped,
            playback_rate: 1.0,
            snap: SnapIncrement::default(),
            view: View::Notes,
            zoom: 8.0,
            graphics: GraphicsLevel::default(),
            window_lock: false,
            selection_mode: SelectionMode::None,
        }
    }
}
