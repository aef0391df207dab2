//! Visible-range filter — which beats get materialized for the current frame.
//!
//! The notes view looks ahead from the cursor by a distance set by the
//! graphics tier, optionally keeping a short tail behind the cursor. The
//! events view shows one fixed-size window of beats at a time.

use serde::{Deserialize, Serialize};

use crate::time::{floor_to_nearest, HIGHEST_PRECISION};

/// Share of the forward span kept visible behind the cursor.
pub const LOOKBEHIND_FRACTION: f64 = 0.2;

/// Render quality tier. Higher tiers draw further ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsLevel {
    Low,
    Medium,
    #[default]
    High,
}

impl GraphicsLevel {
    /// How far the highway surface extends past the cursor, in scene units.
    pub fn surface_depth(self) -> f64 {
        match self {
            GraphicsLevel::Low => 25.0,
            GraphicsLevel::Medium => 50.0,
            GraphicsLevel::High => 75.0,
        }
    }

    /// Next tier, wrapping from `High` back to `Low`.
    pub fn cycle(self) -> Self {
        match self {
            GraphicsLevel::Low => GraphicsLevel::Medium,
            GraphicsLevel::Medium => GraphicsLevel::High,
            GraphicsLevel::High => GraphicsLevel::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GraphicsLevel::Low => "low",
            GraphicsLevel::Medium => "medium",
            GraphicsLevel::High => "high",
        }
    }
}

/// A closed interval of beats, `start <= beat <= end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatRange {
    pub start: f64,
    pub end: f64,
}

impl BeatRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, beat: f64) -> bool {
        beat >= self.start && beat <= self.end
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// Beats visible around `current_beat` for a notes-style highway.
///
/// The forward span is `surface_depth / beat_depth`; with `include_lookbehind`
/// the range also starts [`LOOKBEHIND_FRACTION`] of that span before the cursor.
pub fn compute_visible_range(
    current_beat: f64,
    beat_depth: f64,
    graphics: GraphicsLevel,
    include_lookbehind: bool,
) -> BeatRange {
    let span = graphics.surface_depth() / beat_depth;
    let start = if include_lookbehind {
        current_beat - span * LOOKBEHIND_FRACTION
    } else {
        current_beat
    };
    BeatRange::new(start, current_beat + span)
}

/// Beats per window for each events-view zoom step, widest first.
pub const EVENT_WINDOW_BEATS: [f64; 5] = [16.0, 8.0, 4.0, 2.0, 1.0];

/// An index into [`EVENT_WINDOW_BEATS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventZoom(usize);

impl EventZoom {
    pub const MIN: EventZoom = EventZoom(0);
    pub const MAX: EventZoom = EventZoom(EVENT_WINDOW_BEATS.len() - 1);

    pub fn from_index(index: usize) -> Self {
        EventZoom(index.min(Self::MAX.0))
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn beats_per_window(self) -> f64 {
        EVENT_WINDOW_BEATS[self.0]
    }

    /// Narrower windows. Saturates.
    pub fn zoom_in(self) -> Self {
        Self::from_index(self.0 + 1)
    }

    /// Wider windows. Saturates.
    pub fn zoom_out(self) -> Self {
        EventZoom(self.0.saturating_sub(1))
    }
}

impl Default for EventZoom {
    fn default() -> Self {
        EventZoom(1)
    }
}

/// The fixed window containing `current_beat`.
///
/// Windows start on multiples of `beats_per_window`. Entity beats live on the
/// [`HIGHEST_PRECISION`] grid, so the window ends on the last grid line before
/// the next window starts and no beat belongs to two windows.
pub fn event_window(current_beat: f64, beats_per_window: f64) -> BeatRange {
    let start = window_start(current_beat, beats_per_window);
    BeatRange::new(start, start + beats_per_window - HIGHEST_PRECISION)
}

/// Start beat of the window containing `beat`.
pub fn window_start(beat: f64, beats_per_window: f64) -> f64 {
    // Nudge by half a grid unit so a sample sitting a hair under a boundary
    // counts as inside the next window.
    floor_to_nearest(beat + HIGHEST_PRECISION / 2.0, beats_per_window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn forward_span_from_tier_depth() {
        let range = compute_visible_range(10.0, 8.0, GraphicsLevel::High, false);
        assert_approx_eq!(range.start, 10.0);
        assert_approx_eq!(range.end, 19.375);
        assert!(!range.contains(19.4));
        assert!(range.contains(19.3));
    }

    #[test]
    fn lookbehind_adds_tail() {
        let range = compute_visible_range(10.0, 8.0, GraphicsLevel::High, true);
        assert_approx_eq!(range.start, 10.0 - 9.375 * 0.2);
        assert!(range.contains(9.0));
        assert!(!range.contains(8.0));
    }

    #[test]
    fn tier_changes_window_size() {
        let low = compute_visible_range(0.0, 8.0, GraphicsLevel::Low, false);
        let high = compute_visible_range(0.0, 8.0, GraphicsLevel::High, false);
        assert_approx_eq!(low.span() * 3.0, high.span());
    }

    #[test]
    fn closed_interval() {
        let range = BeatRange::new(2.0, 4.0);
        assert!(range.contains(2.0));
        assert!(range.contains(4.0));
        assert!(!range.contains(4.01));
    }

    #[test]
    fn graphics_cycles() {
        assert_eq!(GraphicsLevel::Low.cycle(), GraphicsLevel::Medium);
        assert_eq!(GraphicsLevel::High.cycle(), GraphicsLevel::Low);
        assert_eq!(GraphicsLevel::default(), GraphicsLevel::High);
    }

    #[test]
    fn graphics_yaml_is_lowercase() {
        let yaml = serde_yaml::to_string(&GraphicsLevel::Medium).unwrap();
        assert_eq!(yaml.trim(), "medium");
        let back: GraphicsLevel = serde_yaml::from_str("low").unwrap();
        assert_eq!(back, GraphicsLevel::Low);
    }

    #[test]
    fn event_window_alignment() {
        let w = event_window(13.5, 8.0);
        assert_approx_eq!(w.start, 8.0);
        assert!(w.contains(15.9));
        assert!(!w.contains(16.0));
        assert!(w.contains(8.0));
    }

    #[test]
    fn window_start_tolerates_residue() {
        assert_approx_eq!(window_start(15.9999999, 8.0), 16.0);
        assert_approx_eq!(window_start(16.0, 8.0), 16.0);
    }

    #[test]
    fn event_zoom_table() {
        assert_approx_eq!(EventZoom::default().beats_per_window(), 8.0);
        assert_approx_eq!(EventZoom::default().zoom_in().beats_per_window(), 4.0);
        assert_eq!(EventZoom::MIN.zoom_out(), EventZoom::MIN);
        assert_eq!(EventZoom::MAX.zoom_in(), EventZoom::MAX);
    }
}
