//! Beat → scene-depth mapping.
//!
//! The cursor plane sits at depth `-SONG_OFFSET`. An entity `n` beats after
//! the reference beat sits `n * beat_depth` units past that plane, where
//! `beat_depth` comes from the discrete zoom table. Entities before the
//! reference end up below `-SONG_OFFSET`.

use crate::time::{round_to_nearest, HIGHEST_PRECISION};

/// Distance from the viewer to the cursor plane, in scene units.
pub const SONG_OFFSET: f64 = 6.0;

/// Scene units per beat for each zoom step, most zoomed-out first.
pub const BEAT_DEPTHS: [f64; 5] = [4.0, 6.0, 8.0, 12.0, 16.0];

/// An index into [`BEAT_DEPTHS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoomLevel(usize);

impl ZoomLevel {
    pub const MIN: ZoomLevel = ZoomLevel(0);
    pub const MAX: ZoomLevel = ZoomLevel(BEAT_DEPTHS.len() - 1);

    /// Build from a table index, clamping out-of-range values.
    pub fn from_index(index: usize) -> Self {
        ZoomLevel(index.min(Self::MAX.0))
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// Scene units per beat.
    pub fn beat_depth(self) -> f64 {
        BEAT_DEPTHS[self.0]
    }

    /// One step closer (more depth per beat). Saturates.
    pub fn zoom_in(self) -> Self {
        Self::from_index(self.0 + 1)
    }

    /// One step further out. Saturates.
    pub fn zoom_out(self) -> Self {
        ZoomLevel(self.0.saturating_sub(1))
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        ZoomLevel(2)
    }
}

/// Snap `value` onto the [`HIGHEST_PRECISION`] grid.
///
/// Anything compared against a threshold goes through here first so that
/// `11.999994` and `12` land on the same side.
pub fn settle(value: f64) -> f64 {
    round_to_nearest(value, HIGHEST_PRECISION)
}

/// Depth offset of an entity at `entity_beat`, relative to `reference_beat`.
///
/// Pass `0.0` as the reference for a static layout, or the live cursor beat
/// for a highway that scrolls during playback.
pub fn beat_to_spatial_offset(entity_beat: f64, reference_beat: f64, beat_depth: f64) -> f64 {
    -SONG_OFFSET + settle(entity_beat - reference_beat) * beat_depth
}

/// Inverse of [`beat_to_spatial_offset`] for a given reference.
pub fn spatial_offset_to_beat(offset: f64, reference_beat: f64, beat_depth: f64) -> f64 {
    reference_beat + (offset + SONG_OFFSET) / beat_depth
}

/// Whether an entity at `offset` has passed the cursor plane.
///
/// The offset is settled first; an entity sitting exactly on the plane is
/// not behind it.
pub fn is_behind_cursor(offset: f64) -> bool {
    settle(offset) < -SONG_OFFSET
}
