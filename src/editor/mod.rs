//! Editor facade — one transport, one beatmap, one selection machine.
//!
//! [`Editor::frame`] is called once per render frame. It commits any pending
//! selection reset, samples the cursor once and derives the visible range and
//! every entity offset from that one sample. Pointer events are only accepted
//! for entities inside the range of the last frame.

use crate::audio::{AudioEngine, AudioError};
use crate::beatmap::{EntityId, EntityKind, EntityStore, View};
use crate::playback::{PlaybackController, PlaybackFrame};
use crate::selection::{PointerButton, SelectionMachine, SelectionMode, SelectionOutcome};
use crate::space::beat_to_spatial_offset;
use crate::time::Direction;
use crate::visible::{compute_visible_range, event_window, BeatRange};

/// An entity materialized for this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleEntity {
    pub id: EntityId,
    pub beat: f64,
    pub kind: EntityKind,
    pub selected: bool,
    /// Depth offset relative to the cursor, see [`beat_to_spatial_offset`].
    pub offset: f64,
}

/// Everything a view needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub playback: PlaybackFrame,
    pub view: View,
    pub range: BeatRange,
    /// Scene units per beat used for `offset`.
    pub beat_depth: f64,
    /// Visible entities in beat order.
    pub entities: Vec<VisibleEntity>,
    pub selection_mode: SelectionMode,
}

pub struct Editor<E: AudioEngine, S: EntityStore> {
    playback: PlaybackController<E>,
    store: S,
    selection: SelectionMachine,
    /// View and range of the last frame; pointer hits are tested against it.
    hit_range: Option<(View, BeatRange)>,
}

impl<E: AudioEngine, S: EntityStore> Editor<E, S> {
    pub fn new(playback: PlaybackController<E>, store: S) -> Self {
        Self {
            playback,
            store,
            selection: SelectionMachine::new(),
            hit_range: None,
        }
    }

    /// Visible range around `beat` for the current view and zoom settings.
    fn range_at(&self, beat: f64) -> BeatRange {
        match self.playback.view() {
            View::Notes => compute_visible_range(
                beat,
                self.playback.zoom().beat_depth(),
                self.playback.graphics(),
                true,
            ),
            View::Events => event_window(beat, self.playback.event_zoom().beats_per_window()),
        }
    }

    /// Produce this frame's snapshot.
    pub fn frame(&mut self, now_ms: f64) -> Result<Frame, AudioError> {
        self.selection.commit();
        let playback = self.playback.tick(now_ms)?;

        let view = self.playback.view();
        let range = self.range_at(playback.beat);
        let beat_depth = self.playback.zoom().beat_depth();
        let entities = self
            .store
            .in_range(view, range)
            .into_iter()
            .map(|e| VisibleEntity {
                id: e.id,
                beat: e.beat,
                kind: e.kind,
                selected: e.selected,
                offset: beat_to_spatial_offset(e.beat, playback.beat, beat_depth),
            })
            .collect();

        self.hit_range = Some((view, range));
        Ok(Frame {
            playback,
            view,
            range,
            beat_depth,
            entities,
            selection_mode: self.selection.mode(),
        })
    }

    fn is_hit_testable(&self, id: EntityId) -> bool {
        let Some((view, range)) = self.hit_range else {
            return false;
        };
        self.store
            .get(id)
            .is_some_and(|e| e.view() == view && range.contains(e.beat))
    }

    // --- pointer input ---

    pub fn on_pointer_down(
        &mut self,
        id: EntityId,
        button: PointerButton,
    ) -> Option<SelectionOutcome> {
        if !self.is_hit_testable(id) {
            tracing::trace!(?id, "pointer-down outside visible range ignored");
            return None;
        }
        self.selection.on_pointer_down(&mut self.store, id, button)
    }

    pub fn on_pointer_over(&mut self, id: EntityId) -> Option<SelectionOutcome> {
        if !self.is_hit_testable(id) {
            return None;
        }
        self.selection.on_pointer_over(&mut self.store, id)
    }

    /// Pointer released anywhere. Always accepted.
    pub fn on_global_pointer_up(&mut self) {
        self.selection.on_global_pointer_up();
    }

    // --- keyboard editing ---

    pub fn clear_selection(&mut self) -> usize {
        let view = self.playback.view();
        self.selection.clear_selection(&mut self.store, view)
    }

    /// Select everything in the last frame's visible range.
    pub fn select_visible(&mut self) -> usize {
        match self.hit_range {
            Some((view, range)) => self.selection.select_range(&mut self.store, view, range),
            None => 0,
        }
    }

    pub fn delete_selection(&mut self) -> usize {
        let view = self.playback.view();
        self.selection.delete_selection(&mut self.store, view)
    }

    /// Move the selection one snap step.
    pub fn nudge_selection(&mut self, direction: Direction) -> usize {
        let view = self.playback.view();
        let delta = self.playback.snap().beats() * direction.sign();
        self.selection.nudge_selection(&mut self.store, view, delta)
    }

    // --- transport shortcuts ---

    pub fn current_beat(&self) -> f64 {
        self.playback.current_beat()
    }

    pub fn current_time_ms(&self) -> f64 {
        self.playback.current_time_ms()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn play(&mut self) -> Result<(), AudioError> {
        self.playback.play()
    }

    pub fn pause(&mut self) -> Result<(), AudioError> {
        self.playback.pause()
    }

    pub fn seek(&mut self, ms: f64) -> Result<(), AudioError> {
        self.playback.seek_ms(ms)
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), AudioError> {
        self.playback.set_playback_rate(rate)
    }

    pub fn playback(&self) -> &PlaybackController<E> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController<E> {
        &mut self.playback
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn selection(&self) -> &SelectionMachine {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioClip, AudioTransport, HeadlessEngine};
    use crate::beatmap::{Beatmap, CutDirection, Note, NoteColor};
    use crate::config::EditorConfig;
    use crate::playback::Song;
    use crate::visible::GraphicsLevel;
    use assert_approx_eq::assert_approx_eq;
    use std::sync::Arc;

    fn editor(map: Beatmap) -> Editor<HeadlessEngine, Beatmap> {
        let mut transport = AudioTransport::new(HeadlessEngine::new());
        let clip = AudioClip::from_interleaved(vec![0.0; 12_000], 1, 100);
        transport.load_clip(Arc::new(clip)).unwrap();
        let config = EditorConfig {
            graphics: GraphicsLevel::High,
            ..EditorConfig::default()
        };
        let playback = PlaybackController::new(transport, Song::new(60.0, 0.0), &config).unwrap();
        Editor::new(playback, map)
    }

    fn note(map: &mut Beatmap, beat: f64) -> EntityId {
        map.add_note(beat, Note::block(NoteColor::Red, 0, 0, CutDirection::Any))
    }

    #[test]
    fn frame_filters_and_maps() {
        let mut map = Beatmap::new();
        let inside = note(&mut map, 19.3);
        note(&mut map, 19.4);
        let mut ed = editor(map);
        ed.seek(10_000.0).unwrap();

        let frame = ed.frame(0.0).unwrap();
        assert_approx_eq!(frame.playback.beat, 10.0);
        assert_approx_eq!(frame.range.end, 19.375);
        assert_eq!(frame.entities.len(), 1);
        assert_eq!(frame.entities[0].id, inside);
        assert!(frame.entities[0].offset > 0.0);
    }

    #[test]
    fn nothing_hit_testable_before_first_frame() {
        let mut map = Beatmap::new();
        let a = note(&mut map, 1.0);
        let mut ed = editor(map);
        assert_eq!(ed.on_pointer_down(a, PointerButton::Primary), None);
    }

    #[test]
    fn offscreen_entities_ignore_pointer() {
        let mut map = Beatmap::new();
        let near = note(&mut map, 2.0);
        let far = note(&mut map, 50.0);
        let mut ed = editor(map);
        ed.frame(0.0).unwrap();

        assert_eq!(
            ed.on_pointer_down(far, PointerButton::Primary),
            None
        );
        assert_eq!(
            ed.on_pointer_down(near, PointerButton::Primary),
            Some(SelectionOutcome::Selected(near))
        );
        assert_eq!(ed.on_pointer_over(far), None);
    }

    #[test]
    fn frame_commits_pending_reset() {
        let mut map = Beatmap::new();
        let a = note(&mut map, 2.0);
        let mut ed = editor(map);
        ed.frame(0.0).unwrap();

        ed.on_pointer_down(a, PointerButton::Primary);
        ed.on_global_pointer_up();
        assert_eq!(ed.selection().mode(), SelectionMode::Selecting);

        let frame = ed.frame(16.0).unwrap();
        assert_eq!(frame.selection_mode, SelectionMode::None);
    }

    #[test]
    fn keyboard_editing_uses_current_view() {
        let mut map = Beatmap::new();
        let a = note(&mut map, 1.0);
        let b = note(&mut map, 3.0);
        let mut ed = editor(map);
        ed.frame(0.0).unwrap();

        assert_eq!(ed.select_visible(), 2);
        assert_eq!(ed.nudge_selection(Direction::Forwards), 2);
        assert_approx_eq!(ed.store().get(a).unwrap().beat, 1.5);
        assert_eq!(ed.clear_selection(), 2);

        ed.frame(16.0).unwrap();
        ed.on_pointer_down(b, PointerButton::Primary);
        assert_eq!(ed.delete_selection(), 1);
        assert!(ed.store().get(b).is_none());
    }

    #[test]
    fn events_view_uses_fixed_window() {
        let mut ed = editor(Beatmap::new());
        ed.playback_mut().set_view(View::Events);
        ed.seek(13_000.0).unwrap();
        let frame = ed.frame(0.0).unwrap();
        assert_approx_eq!(frame.range.start, 8.0);
        assert!(frame.range.contains(15.9));
        assert!(!frame.range.contains(16.0));
    }
}
