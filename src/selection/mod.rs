//! Drag-gesture selection — select, deselect or delete every entity the
//! pointer passes over.
//!
//! A gesture starts with a pointer-down on an entity. The button and the
//! entity's current `selected` flag pick the mode; every entity the pointer
//! then moves over gets the same operation. Releasing the pointer anywhere
//! closes the gesture in two phases: [`SelectionMachine::on_global_pointer_up`]
//! marks it closing and [`SelectionMachine::commit`], run at the start of the
//! next frame, resets the mode. Pointer-over events that were already queued
//! behind the release still land on the gesture they belong to.

use crate::beatmap::{EntityId, EntityStore, View};
use crate::visible::BeatRange;

/// Operation applied by the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    None,
    Selecting,
    Deselecting,
    Deleting,
}

impl SelectionMode {
    pub fn label(self) -> &'static str {
        match self {
            SelectionMode::None => "none",
            SelectionMode::Selecting => "select",
            SelectionMode::Deselecting => "deselect",
            SelectionMode::Deleting => "delete",
        }
    }
}

/// Mouse button of a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// What a pointer event did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Selected(EntityId),
    Deselected(EntityId),
    Deleted(EntityId),
    /// Middle click swapped the entity's colour.
    Cycled(EntityId),
}

/// Selection-mode state for one editor.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    mode: SelectionMode,
    view: Option<View>,
    closing: bool,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// View of the active gesture, if any.
    pub fn view(&self) -> Option<View> {
        self.view
    }

    /// Whether a pointer-up has been seen and the reset is waiting for [`commit`](Self::commit).
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Pointer pressed on `id`.
    ///
    /// Middle clicks cycle the entity's colour and never touch the mode.
    /// A press while another gesture is still active is ignored; a press while
    /// the previous gesture is closing commits that reset first.
    pub fn on_pointer_down<S: EntityStore + ?Sized>(
        &mut self,
        store: &mut S,
        id: EntityId,
        button: PointerButton,
    ) -> Option<SelectionOutcome> {
        if button == PointerButton::Middle {
            return store.cycle_property(id).then_some(SelectionOutcome::Cycled(id));
        }

        if self.closing {
            self.commit();
        }
        if self.mode != SelectionMode::None {
            tracing::trace!(?id, mode = self.mode.label(), "pointer-down during active gesture ignored");
            return None;
        }

        let Some(entity) = store.get(id) else {
            tracing::trace!(?id, "pointer-down on missing entity ignored");
            return None;
        };
        let view = entity.view();
        let mode = match (button, entity.selected) {
            (PointerButton::Secondary, _) => SelectionMode::Deleting,
            (_, true) => SelectionMode::Deselecting,
            (_, false) => SelectionMode::Selecting,
        };

        self.mode = mode;
        self.view = Some(view);
        tracing::debug!(?id, mode = mode.label(), view = view.label(), "gesture started");
        self.apply(store, id)
    }

    /// Pointer moved over `id` during a gesture.
    ///
    /// Re-applying an operation is a no-op. Entities that no longer exist or
    /// belong to the other view are skipped.
    pub fn on_pointer_over<S: EntityStore + ?Sized>(
        &mut self,
        store: &mut S,
        id: EntityId,
    ) -> Option<SelectionOutcome> {
        if self.mode == SelectionMode::None {
            return None;
        }
        let Some(entity) = store.get(id) else {
            tracing::trace!(?id, "pointer-over on missing entity ignored");
            return None;
        };
        if Some(entity.view()) != self.view {
            return None;
        }
        self.apply(store, id)
    }

    /// Pointer released anywhere. The reset happens on the next [`commit`](Self::commit).
    pub fn on_global_pointer_up(&mut self) {
        if self.mode != SelectionMode::None {
            self.closing = true;
        }
    }

    /// Finish a closing gesture. Called once at the start of every frame.
    pub fn commit(&mut self) {
        if self.closing {
            tracing::debug!(mode = self.mode.label(), "gesture ended");
            self.mode = SelectionMode::None;
            self.view = None;
            self.closing = false;
        }
    }

    fn apply<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        id: EntityId,
    ) -> Option<SelectionOutcome> {
        match self.mode {
            SelectionMode::None => None,
            SelectionMode::Selecting => store
                .set_selected(id, true)
                .then_some(SelectionOutcome::Selected(id)),
            SelectionMode::Deselecting => store
                .set_selected(id, false)
                .then_some(SelectionOutcome::Deselected(id)),
            SelectionMode::Deleting => store.remove(id).map(|_| SelectionOutcome::Deleted(id)),
        }
    }

    /// Deselect everything in `view`. Returns the number deselected.
    pub fn clear_selection<S: EntityStore + ?Sized>(&self, store: &mut S, view: View) -> usize {
        store
            .selected_ids(view)
            .into_iter()
            .filter(|&id| store.set_selected(id, false))
            .count()
    }

    /// Select every entity of `view` inside `range`. Returns the number newly selected.
    pub fn select_range<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        view: View,
        range: BeatRange,
    ) -> usize {
        let ids: Vec<EntityId> = store.in_range(view, range).iter().map(|e| e.id).collect();
        ids.into_iter()
            .filter(|&id| store.set_selected(id, true))
            .count()
    }

    /// Delete the selection in `view`.
    pub fn delete_selection<S: EntityStore + ?Sized>(&self, store: &mut S, view: View) -> usize {
        let removed = store.remove_selected(view);
        tracing::debug!(removed, view = view.label(), "selection deleted");
        removed
    }

    /// Move the selection in `view` by `delta` beats.
    pub fn nudge_selection<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        view: View,
        delta: f64,
    ) -> usize {
        store.shift_selected(view, delta)
    }
}
