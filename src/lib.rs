//! Beatmapper — a beat-synchronized editing core for rhythm-game beatmaps.
//!
//! One audio transport is the single source of truth for the playback
//! position. The cursor, the visible slice of the map, entity depth offsets
//! and mouse-driven selection are all derived from it once per frame.

pub mod audio;
pub mod beatmap;
pub mod config;
pub mod editor;
pub mod playback;
pub mod selection;
pub mod space;
pub mod time;
pub mod tui;
pub mod visible;
