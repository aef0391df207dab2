//! Beatmap data model — notes, obstacles and lighting events placed on beats.
//!
//! Every placed thing is an [`Entity`]: a beat, a kind-specific payload and a
//! `selected` flag. Notes and obstacles are edited in the notes view, lighting
//! events in the events view.

pub mod store;

pub use store::{Beatmap, EntityStore};

/// Opaque entity handle. Ids are never reused within a beatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

/// Which editor an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Notes,
    Events,
}

impl View {
    pub fn toggle(self) -> Self {
        match self {
            View::Notes => View::Events,
            View::Events => View::Notes,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Notes => "notes",
            View::Events => "events",
        }
    }
}

/// Saber colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteColor {
    Red,
    Blue,
}

impl NoteColor {
    pub fn swapped(self) -> Self {
        match self {
            NoteColor::Red => NoteColor::Blue,
            NoteColor::Blue => NoteColor::Red,
        }
    }
}

/// Block or bomb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Block(NoteColor),
    Bomb,
}

/// Direction the block must be cut in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutDirection {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Any,
}

/// A block or bomb on the 4×3 grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub kind: NoteKind,
    /// Column, 0–3 from the left.
    pub line_index: u8,
    /// Row, 0–2 from the bottom.
    pub line_layer: u8,
    pub direction: CutDirection,
}

impl Note {
    pub fn block(color: NoteColor, line_index: u8, line_layer: u8, direction: CutDirection) -> Self {
        Self {
            kind: NoteKind::Block(color),
            line_index: line_index.min(3),
            line_layer: line_layer.min(2),
            direction,
        }
    }

    pub fn bomb(line_index: u8, line_layer: u8) -> Self {
        Self {
            kind: NoteKind::Bomb,
            line_index: line_index.min(3),
            line_layer: line_layer.min(2),
            direction: CutDirection::Any,
        }
    }
}

/// Full-height wall or overhead ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Wall,
    Ceiling,
}

/// An obstacle spanning columns and beats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Leftmost column.
    pub line_index: u8,
    /// Number of columns covered.
    pub width: u8,
    /// Length in beats.
    pub duration: f64,
}

/// Lighting and environment tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTrack {
    BackLasers,
    RingLights,
    LeftLaser,
    RightLaser,
    PrimaryLight,
    RingRotation,
    RingZoom,
    LeftLaserSpeed,
    RightLaserSpeed,
}

impl EventTrack {
    pub const ALL: [EventTrack; 9] = [
        EventTrack::BackLasers,
        EventTrack::RingLights,
        EventTrack::LeftLaser,
        EventTrack::RightLaser,
        EventTrack::PrimaryLight,
        EventTrack::RingRotation,
        EventTrack::RingZoom,
        EventTrack::LeftLaserSpeed,
        EventTrack::RightLaserSpeed,
    ];

    /// Whether events on this track carry a light effect and colour.
    pub fn is_light(self) -> bool {
        matches!(
            self,
            EventTrack::BackLasers
                | EventTrack::RingLights
                | EventTrack::LeftLaser
                | EventTrack::RightLaser
                | EventTrack::PrimaryLight
        )
    }

    /// Whether events on this track carry a speed value.
    pub fn is_speed(self) -> bool {
        matches!(self, EventTrack::LeftLaserSpeed | EventTrack::RightLaserSpeed)
    }

    pub fn label(self) -> &'static str {
        match self {
            EventTrack::BackLasers => "back lasers",
            EventTrack::RingLights => "ring lights",
            EventTrack::LeftLaser => "left laser",
            EventTrack::RightLaser => "right laser",
            EventTrack::PrimaryLight => "primary light",
            EventTrack::RingRotation => "ring rotation",
            EventTrack::RingZoom => "ring zoom",
            EventTrack::LeftLaserSpeed => "left laser speed",
            EventTrack::RightLaserSpeed => "right laser speed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightEffect {
    Off,
    On,
    Flash,
    Fade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightColor {
    Red,
    Blue,
}

impl LightColor {
    pub fn swapped(self) -> Self {
        match self {
            LightColor::Red => LightColor::Blue,
            LightColor::Blue => LightColor::Red,
        }
    }
}

/// What a lighting event does when the cursor reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventAction {
    /// Light tracks: an effect in a colour. `Off` ignores the colour.
    Light { effect: LightEffect, color: LightColor },
    /// Ring rotation and zoom: fire once.
    Trigger,
    /// Laser speed tracks: a speed step, 0–8.
    Speed(u8),
}

/// A lighting event on one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightingEvent {
    pub track: EventTrack,
    pub action: EventAction,
}

impl LightingEvent {
    pub fn light(track: EventTrack, effect: LightEffect, color: LightColor) -> Self {
        Self {
            track,
            action: EventAction::Light { effect, color },
        }
    }

    pub fn trigger(track: EventTrack) -> Self {
        Self {
            track,
            action: EventAction::Trigger,
        }
    }

    pub fn speed(track: EventTrack, speed: u8) -> Self {
        Self {
            track,
            action: EventAction::Speed(speed.min(8)),
        }
    }
}

/// Kind-specific payload of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Note(Note),
    Obstacle(Obstacle),
    Event(LightingEvent),
}

/// Anything placed on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    /// Beat position. May be fractional.
    pub beat: f64,
    pub kind: EntityKind,
    pub selected: bool,
}

impl Entity {
    /// The view this entity is edited in.
    pub fn view(&self) -> View {
        match self.kind {
            EntityKind::Note(_) | EntityKind::Obstacle(_) => View::Notes,
            EntityKind::Event(_) => View::Events,
        }
    }

    /// Swap the entity's colour. Returns `false` for kinds with nothing to swap.
    pub fn cycle_color(&mut self) -> bool {
        match &mut self.kind {
            EntityKind::Note(note) => match note.kind {
                NoteKind::Block(color) => {
                    note.kind = NoteKind::Block(color.swapped());
                    true
                }
                NoteKind::Bomb => false,
            },
            EntityKind::Event(event) => match event.action {
                EventAction::Light { effect, color } => {
                    event.action = EventAction::Light {
                        effect,
                        color: color.swapped(),
                    };
                    true
                }
                EventAction::Trigger | EventAction::Speed(_) => false,
            },
            EntityKind::Obstacle(_) => false,
        }
    }
}
