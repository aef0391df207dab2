//! Keyed entity storage.

use std::collections::BTreeMap;

use super::{Entity, EntityId, EntityKind, LightingEvent, Note, Obstacle, View};
use crate::space::settle;
use crate::visible::BeatRange;

/// The keyed entity store the editing core reads and mutates.
///
/// Selection flags only change through [`EntityStore::set_selected`] and the
/// bulk operations below; the selection machine is the one caller.
pub trait EntityStore {
    fn get(&self, id: EntityId) -> Option<&Entity>;

    /// Set the `selected` flag. Returns `true` if the flag changed, `false`
    /// if it already had that value or the entity does not exist.
    fn set_selected(&mut self, id: EntityId, selected: bool) -> bool;

    fn remove(&mut self, id: EntityId) -> Option<Entity>;

    /// Swap the entity's colour. Returns `true` if anything changed.
    fn cycle_property(&mut self, id: EntityId) -> bool;

    /// Entities of `view` whose beat lies in `range`, in beat order.
    fn in_range(&self, view: View, range: BeatRange) -> Vec<&Entity>;

    /// Ids of selected entities in `view`, in beat order.
    fn selected_ids(&self, view: View) -> Vec<EntityId>;

    /// Move every selected entity of `view` by `delta` beats, not below 0.
    /// Returns the number moved.
    fn shift_selected(&mut self, view: View, delta: f64) -> usize;

    /// Delete every selected entity of `view`. Returns the number removed.
    fn remove_selected(&mut self, view: View) -> usize;
}

/// In-memory beatmap for one difficulty.
#[derive(Debug, Clone, Default)]
pub struct Beatmap {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
}

impl Beatmap {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, beat: f64, kind: EntityKind) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            id,
            Entity {
                id,
                beat: settle(beat.max(0.0)),
                kind,
                selected: false,
            },
        );
        id
    }

    pub fn add_note(&mut self, beat: f64, note: Note) -> EntityId {
        self.insert(beat, EntityKind::Note(note))
    }

    pub fn add_obstacle(&mut self, beat: f64, obstacle: Obstacle) -> EntityId {
        self.insert(beat, EntityKind::Obstacle(obstacle))
    }

    pub fn add_event(&mut self, beat: f64, event: LightingEvent) -> EntityId {
        self.insert(beat, EntityKind::Event(event))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    fn sorted_by_beat<'a>(mut entities: Vec<&'a Entity>) -> Vec<&'a Entity> {
        entities.sort_by(|a, b| a.beat.total_cmp(&b.beat).then(a.id.cmp(&b.id)));
        entities
    }
}

impl EntityStore for Beatmap {
    fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    fn set_selected(&mut self, id: EntityId, selected: bool) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) if entity.selected != selected => {
                entity.selected = selected;
                true
            }
            _ => false,
        }
    }

    fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    fn cycle_property(&mut self, id: EntityId) -> bool {
        self.entities
            .get_mut(&id)
            .is_some_and(|entity| entity.cycle_color())
    }

    fn in_range(&self, view: View, range: BeatRange) -> Vec<&Entity> {
        let hits = self
            .entities
            .values()
            .filter(|e| e.view() == view && range.contains(e.beat))
            .collect();
        Self::sorted_by_beat(hits)
    }

    fn selected_ids(&self, view: View) -> Vec<EntityId> {
        let selected = self
            .entities
            .values()
            .filter(|e| e.view() == view && e.selected)
            .collect();
        Self::sorted_by_beat(selected)
            .into_iter()
            .map(|e| e.id)
            .collect()
    }

    fn shift_selected(&mut self, view: View, delta: f64) -> usize {
        let mut moved = 0;
        for entity in self.entities.values_mut() {
            if entity.view() == view && entity.selected {
                entity.beat = settle((entity.beat + delta).max(0.0));
                moved += 1;
            }
        }
        moved
    }

    fn remove_selected(&mut self, view: View) -> usize {
        let before = self.entities.len();
        self.entities
            .retain(|_, e| !(e.view() == view && e.selected));
        before - self.entities.len()
    }
}
