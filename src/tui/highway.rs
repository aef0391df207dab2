//! Highway projection — lays a frame's visible entities onto a row/column grid.
//!
//! Rows are equal slices of scene depth, furthest first. Columns are the four
//! note lanes in the notes view and one column per lighting track in the
//! events view. The projection is pure so the drawing code and mouse hit
//! testing share one layout.

use crate::beatmap::{
    CutDirection, EntityId, EntityKind, EventAction, EventTrack, LightEffect, NoteKind, View,
};
use crate::editor::{Frame, VisibleEntity};
use crate::space::{beat_to_spatial_offset, is_behind_cursor, SONG_OFFSET};

/// Note lanes in the notes view.
pub const NOTE_LANES: usize = 4;

/// What occupies a highway cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Block { red: bool, direction: CutDirection },
    Bomb,
    Wall,
    Light { red: bool, effect: LightEffect },
    Trigger,
    Speed(u8),
}

impl Glyph {
    /// Single-character rendering.
    pub fn symbol(self) -> char {
        match self {
            Glyph::Block { direction, .. } => match direction {
                CutDirection::Up => '↑',
                CutDirection::Down => '↓',
                CutDirection::Left => '←',
                CutDirection::Right => '→',
                CutDirection::UpLeft => '↖',
                CutDirection::UpRight => '↗',
                CutDirection::DownLeft => '↙',
                CutDirection::DownRight => '↘',
                CutDirection::Any => '●',
            },
            Glyph::Bomb => '✱',
            Glyph::Wall => '█',
            Glyph::Light { effect, .. } => match effect {
                LightEffect::Off => '·',
                LightEffect::On => '■',
                LightEffect::Flash => '◆',
                LightEffect::Fade => '◇',
            },
            Glyph::Trigger => '⟳',
            Glyph::Speed(n) => char::from_digit(u32::from(n.min(9)), 10).unwrap_or('?'),
        }
    }

    /// Whether the glyph is drawn in the red palette.
    pub fn is_red(self) -> bool {
        match self {
            Glyph::Block { red, .. } | Glyph::Light { red, .. } => red,
            _ => false,
        }
    }
}

/// An entity drawn in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub id: EntityId,
    pub glyph: Glyph,
    pub selected: bool,
    /// The entity has passed the cursor plane.
    pub passed: bool,
}

/// A projected highway.
#[derive(Debug, Clone, PartialEq)]
pub struct Highway {
    pub rows: usize,
    pub columns: usize,
    /// `cells[row][column]`, row 0 furthest from the viewer.
    pub cells: Vec<Vec<Option<Mark>>>,
    /// Row holding the cursor plane, if it is on screen.
    pub cursor_row: Option<usize>,
}

impl Highway {
    /// Entity drawn at `(row, column)`.
    pub fn entity_at(&self, row: usize, column: usize) -> Option<EntityId> {
        self.cells.get(row)?.get(column)?.map(|m| m.id)
    }
}

/// Number of columns for `view`.
pub fn columns_for(view: View) -> usize {
    match view {
        View::Notes => NOTE_LANES,
        View::Events => EventTrack::ALL.len(),
    }
}

fn track_column(track: EventTrack) -> usize {
    EventTrack::ALL
        .iter()
        .position(|&t| t == track)
        .unwrap_or(0)
}

fn glyph_for(entity: &VisibleEntity) -> Glyph {
    match entity.kind {
        EntityKind::Note(note) => match note.kind {
            NoteKind::Block(color) => Glyph::Block {
                red: color == crate::beatmap::NoteColor::Red,
                direction: note.direction,
            },
            NoteKind::Bomb => Glyph::Bomb,
        },
        EntityKind::Obstacle(_) => Glyph::Wall,
        EntityKind::Event(event) => match event.action {
            EventAction::Light { effect, color } => Glyph::Light {
                red: color == crate::beatmap::LightColor::Red,
                effect,
            },
            EventAction::Trigger => Glyph::Trigger,
            EventAction::Speed(n) => Glyph::Speed(n),
        },
    }
}

/// Project `frame` onto `rows` rows.
///
/// The top row sits at the far end of the visible range, the bottom row at its
/// start. Obstacles extend over every row their duration covers.
pub fn project(frame: &Frame, rows: usize) -> Highway {
    let columns = columns_for(frame.view);
    let mut cells = vec![vec![None; columns]; rows];
    if rows == 0 {
        return Highway {
            rows,
            columns,
            cells,
            cursor_row: None,
        };
    }

    let reference = frame.playback.beat;
    let depth = frame.beat_depth;
    let far = beat_to_spatial_offset(frame.range.end, reference, depth);
    let near = beat_to_spatial_offset(frame.range.start, reference, depth);
    let span = far - near;

    let row_of = |offset: f64| -> Option<usize> {
        if span <= 0.0 {
            return None;
        }
        let t = (far - offset) / span;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }
        Some(((t * (rows - 1) as f64).round() as usize).min(rows - 1))
    };

    for entity in &frame.entities {
        let glyph = glyph_for(entity);
        let mark = Mark {
            id: entity.id,
            glyph,
            selected: entity.selected,
            passed: is_behind_cursor(entity.offset),
        };
        let Some(start_row) = row_of(entity.offset) else {
            continue;
        };

        match entity.kind {
            EntityKind::Obstacle(obstacle) => {
                let end_offset =
                    beat_to_spatial_offset(entity.beat + obstacle.duration, reference, depth);
                let end_row = row_of(end_offset.min(far)).unwrap_or(0);
                let first = usize::from(obstacle.line_index).min(columns - 1);
                let last = (first + usize::from(obstacle.width.max(1))).min(columns);
                for row in cells.iter_mut().take(start_row + 1).skip(end_row) {
                    for cell in row.iter_mut().take(last).skip(first) {
                        cell.get_or_insert(mark);
                    }
                }
            }
            EntityKind::Note(note) => {
                let column = usize::from(note.line_index).min(columns - 1);
                cells[start_row][column] = Some(mark);
            }
            EntityKind::Event(event) => {
                cells[start_row][track_column(event.track)] = Some(mark);
            }
        }
    }

    Highway {
        rows,
        columns,
        cells,
        cursor_row: row_of(-SONG_OFFSET),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::{
        LightColor, LightingEvent, Note, NoteColor, Obstacle, ObstacleKind,
    };
    use crate::playback::{PlaybackFrame, PlaybackState};
    use crate::selection::SelectionMode;
    use crate::visible::BeatRange;

    fn frame(view: View, range: BeatRange, beat: f64, entities: Vec<(u64, f64, EntityKind)>) -> Frame {
        let depth = 8.0;
        Frame {
            playback: PlaybackFrame {
                time_ms: 0.0,
                beat,
                duration_ms: 60_000.0,
                state: PlaybackState::Stopped,
                playback_rate: 1.0,
            },
            view,
            range,
            beat_depth: depth,
            entities: entities
                .into_iter()
                .map(|(id, b, kind)| VisibleEntity {
                    id: EntityId(id),
                    beat: b,
                    kind,
                    selected: false,
                    offset: beat_to_spatial_offset(b, beat, depth),
                })
                .collect(),
            selection_mode: SelectionMode::None,
        }
    }

    fn blue(lane: u8) -> EntityKind {
        EntityKind::Note(Note::block(NoteColor::Blue, lane, 0, CutDirection::Up))
    }

    #[test]
    fn empty_frame_has_cursor() {
        // Range 0..10 with the cursor at beat 2: row 8 of 11.
        let f = frame(View::Notes, BeatRange::new(0.0, 10.0), 2.0, vec![]);
        let h = project(&f, 11);
        assert_eq!(h.columns, NOTE_LANES);
        assert_eq!(h.cursor_row, Some(8));
        assert!(h.cells.iter().flatten().all(Option::is_none));
    }

    #[test]
    fn notes_land_in_lane_and_row() {
        let f = frame(
            View::Notes,
            BeatRange::new(0.0, 10.0),
            0.0,
            vec![(1, 10.0, blue(0)), (2, 5.0, blue(3)), (3, 0.0, blue(1))],
        );
        let h = project(&f, 11);
        assert_eq!(h.entity_at(0, 0), Some(EntityId(1)));
        assert_eq!(h.entity_at(5, 3), Some(EntityId(2)));
        assert_eq!(h.entity_at(10, 1), Some(EntityId(3)));
        assert_eq!(h.entity_at(10, 0), None);
    }

    #[test]
    fn obstacles_span_rows_and_columns() {
        let wall = EntityKind::Obstacle(Obstacle {
            kind: ObstacleKind::Wall,
            line_index: 1,
            width: 2,
            duration: 2.0,
        });
        let f = frame(View::Notes, BeatRange::new(0.0, 10.0), 0.0, vec![(7, 4.0, wall)]);
        let h = project(&f, 11);
        for row in 4..=6 {
            assert_eq!(h.entity_at(row, 1), Some(EntityId(7)), "row {row}");
            assert_eq!(h.entity_at(row, 2), Some(EntityId(7)), "row {row}");
            assert_eq!(h.entity_at(row, 0), None);
            assert_eq!(h.entity_at(row, 3), None);
        }
        assert_eq!(h.entity_at(3, 1), None);
    }

    #[test]
    fn events_use_track_columns() {
        let laser = EntityKind::Event(LightingEvent::light(
            EventTrack::RightLaser,
            LightEffect::Flash,
            LightColor::Red,
        ));
        let f = frame(View::Events, BeatRange::new(8.0, 16.0), 9.0, vec![(4, 12.0, laser)]);
        let h = project(&f, 9);
        assert_eq!(h.columns, 9);
        assert_eq!(h.entity_at(4, 3), Some(EntityId(4)));
    }

    #[test]
    fn entities_behind_the_cursor_are_marked_passed() {
        // Cursor at beat 2 sits on row 8 of 11; beat 1 is below it.
        let f = frame(
            View::Notes,
            BeatRange::new(0.0, 10.0),
            2.0,
            vec![(1, 1.0, blue(0)), (2, 2.0, blue(1)), (3, 6.0, blue(2))],
        );
        let h = project(&f, 11);
        let mark = |row: usize, col: usize| h.cells[row][col].unwrap();
        assert!(mark(9, 0).passed);
        assert!(!mark(8, 1).passed);
        assert!(!mark(4, 2).passed);
    }

    #[test]
    fn zero_rows() {
        let f = frame(View::Notes, BeatRange::new(0.0, 10.0), 0.0, vec![(1, 1.0, blue(0))]);
        let h = project(&f, 0);
        assert!(h.cells.is_empty());
        assert_eq!(h.cursor_row, None);
    }

    #[test]
    fn glyph_symbols() {
        let red_up = Glyph::Block {
            red: true,
            direction: CutDirection::Up,
        };
        assert_eq!(red_up.symbol(), '↑');
        assert!(red_up.is_red());
        assert_eq!(Glyph::Speed(4).symbol(), '4');
        assert_eq!(Glyph::Bomb.symbol(), '✱');
        assert!(!Glyph::Wall.is_red());
    }
}
