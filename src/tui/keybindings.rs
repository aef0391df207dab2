//! Key bindings — maps key events to editor actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Editor actions triggered by key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the editor.
    Quit,
    /// Toggle play/pause.
    TogglePlayback,
    /// Scroll one snap step later.
    ScrollForwards,
    /// Scroll one snap step earlier.
    ScrollBackwards,
    /// Jump one seek increment later.
    SeekForwards,
    /// Jump one seek increment earlier.
    SeekBackwards,
    SkipToStart,
    SkipToEnd,
    SnapFiner,
    SnapCoarser,
    ZoomIn,
    ZoomOut,
    RateUp,
    RateDown,
    /// Switch between the notes and events views.
    ToggleView,
    ToggleWindowLock,
    CycleGraphics,
    SelectVisible,
    ClearSelection,
    DeleteSelection,
    /// Move the selection one snap step later.
    NudgeForwards,
    /// Move the selection one snap step earlier.
    NudgeBackwards,
    ToggleHelp,
}

/// Map a key event to an editor action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if ctrl {
        return match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('a') => Some(Action::SelectVisible),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char(' ') => Some(Action::TogglePlayback),
        KeyCode::Up if shift => Some(Action::NudgeForwards),
        KeyCode::Down if shift => Some(Action::NudgeBackwards),
        KeyCode::Up => Some(Action::ScrollForwards),
        KeyCode::Down => Some(Action::ScrollBackwards),
        KeyCode::PageUp => Some(Action::SeekForwards),
        KeyCode::PageDown => Some(Action::SeekBackwards),
        KeyCode::Home => Some(Action::SkipToStart),
        KeyCode::End => Some(Action::SkipToEnd),
        KeyCode::Char('[') => Some(Action::SnapFiner),
        KeyCode::Char(']') => Some(Action::SnapCoarser),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::ZoomIn),
        KeyCode::Char('-') => Some(Action::ZoomOut),
        KeyCode::Char('.') => Some(Action::RateUp),
        KeyCode::Char(',') => Some(Action::RateDown),
        KeyCode::Tab => Some(Action::ToggleView),
        KeyCode::Char('l') => Some(Action::ToggleWindowLock),
        KeyCode::Char('g') => Some(Action::CycleGraphics),
        KeyCode::Esc => Some(Action::ClearSelection),
        KeyCode::Delete | KeyCode::Backspace => Some(Action::DeleteSelection),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        _ => None,
    }
}

/// Key reference shown in the help overlay.
pub const HELP: &[(&str, &str)] = &[
    ("Space", "play / pause"),
    ("Up / Down", "scroll by snap"),
    ("PgUp / PgDn", "seek by snap or window"),
    ("Home / End", "skip to start / end"),
    ("[ / ]", "finer / coarser snap"),
    ("+ / -", "zoom in / out"),
    (", / .", "slower / faster"),
    ("Tab", "notes / events view"),
    ("l", "window lock"),
    ("g", "graphics tier"),
    ("Ctrl-A", "select visible"),
    ("Esc", "clear selection"),
    ("Del", "delete selection"),
    ("Shift-Up / Down", "nudge selection"),
    ("Mouse", "L select, R delete, M colour, wheel scroll"),
    ("q", "quit"),
];
