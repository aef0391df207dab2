//! TUI end-to-end tests — key and mouse input through the App, rendered to a
//! test backend.

use std::sync::Arc;

use assert_approx_eq::assert_approx_eq;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use beatmapper::audio::{AudioClip, AudioTransport, HeadlessEngine};
use beatmapper::beatmap::{Beatmap, CutDirection, EntityStore, Note, NoteColor, View};
use beatmapper::config::EditorConfig;
use beatmapper::editor::Editor;
use beatmapper::playback::{PlaybackController, PlaybackState, Song};
use beatmapper::tui::keybindings::{self, Action};
use beatmapper::tui::App;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

fn press(app: &mut App<HeadlessEngine>, event: KeyEvent) {
    let action = keybindings::map_key(event).expect("bound key");
    app.handle_action(action, 0.0);
}

/// 30 s at 120 BPM with a few notes near the start.
fn app() -> App<HeadlessEngine> {
    let mut transport = AudioTransport::new(HeadlessEngine::new());
    let clip = AudioClip::from_interleaved(vec![0.0; 3_000], 1, 100);
    transport.load_clip(Arc::new(clip)).unwrap();
    let playback =
        PlaybackController::new(transport, Song::new(120.0, 0.0), &EditorConfig::default())
            .unwrap();

    let mut map = Beatmap::new();
    for (i, beat) in [1.0, 2.0, 3.0].into_iter().enumerate() {
        map.add_note(beat, Note::block(NoteColor::Red, i as u8, 0, CutDirection::Up));
    }
    App::new(Editor::new(playback, map))
}

fn render(app: &mut App<HeadlessEngine>, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| app.draw(frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn first_frame_renders_highway_and_status() {
    let mut app = app();
    app.update(0.0);
    let screen = render(&mut app, 100, 24);

    assert!(screen.contains("Notes"));
    assert!(screen.contains("STOP"));
    assert!(screen.contains("00:00 / 00:30"));
    assert!(screen.contains("snap 1/2"));
    assert!(screen.contains('↑'));
}

#[test]
fn keyboard_session() {
    let mut app = app();
    app.update(0.0);

    press(&mut app, key(KeyCode::Up));
    assert_approx_eq!(app.editor.current_beat(), 0.5);

    press(&mut app, key(KeyCode::Char(']')));
    press(&mut app, key(KeyCode::PageUp));
    assert_approx_eq!(app.editor.current_beat(), 1.0);

    press(&mut app, key(KeyCode::Char(' ')));
    assert!(app.editor.is_playing());
    app.editor
        .playback_mut()
        .transport_mut()
        .engine_mut()
        .advance(1_000.0);
    app.update(16.0);
    assert_eq!(
        app.frame().map(|f| f.playback.state),
        Some(PlaybackState::Playing)
    );
    assert_approx_eq!(app.frame().unwrap().playback.beat, 3.0);

    press(&mut app, key(KeyCode::Home));
    assert!(!app.editor.is_playing());
    assert_approx_eq!(app.editor.current_time_ms(), 0.0);

    press(&mut app, key(KeyCode::Char('q')));
    assert!(app.should_quit);
}

#[test]
fn select_all_then_delete() {
    let mut app = app();
    app.update(0.0);

    press(&mut app, ctrl_key('a'));
    assert_eq!(app.editor.store().selected_ids(View::Notes).len(), 3);
    press(&mut app, key(KeyCode::Delete));
    assert!(app.editor.store().is_empty());
}

#[test]
fn view_toggle_switches_columns() {
    let mut app = app();
    press(&mut app, key(KeyCode::Tab));
    app.update(0.0);
    let screen = render(&mut app, 100, 24);
    assert!(screen.contains("Events"));
    assert!(screen.contains("8 beats"));
}

#[test]
fn help_overlay_lists_bindings() {
    let mut app = app();
    app.update(0.0);
    press(&mut app, key(KeyCode::Char('?')));
    let screen = render(&mut app, 100, 30);
    assert!(screen.contains("play / pause"));
    assert!(screen.contains("nudge selection"));

    press(&mut app, key(KeyCode::Esc));
    assert!(!app.help_visible);
}

#[test]
fn wheel_and_release_outside_highway() {
    let mut app = app();
    app.update(0.0);
    let _ = render(&mut app, 100, 24);

    let wheel = MouseEvent {
        kind: MouseEventKind::ScrollUp,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    };
    app.handle_mouse(wheel, 0.0);
    assert_approx_eq!(app.editor.current_beat(), 0.5);

    // A release with no gesture in progress changes nothing.
    let up = MouseEvent {
        kind: MouseEventKind::Up(MouseButton::Left),
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    };
    app.handle_mouse(up, 16.0);
    assert_eq!(app.editor.playback().state(), PlaybackState::Stopped);
    assert!(app.editor.store().selected_ids(View::Notes).is_empty());
}

#[test]
fn every_action_is_reachable_from_a_key() {
    use Action::*;
    let bound = [
        key(KeyCode::Char('q')),
        key(KeyCode::Char(' ')),
        key(KeyCode::Up),
        key(KeyCode::Down),
        key(KeyCode::PageUp),
        key(KeyCode::PageDown),
        key(KeyCode::Home),
        key(KeyCode::End),
        key(KeyCode::Char('[')),
        key(KeyCode::Char(']')),
        key(KeyCode::Char('+')),
        key(KeyCode::Char('-')),
        key(KeyCode::Char('.')),
        key(KeyCode::Char(',')),
        key(KeyCode::Tab),
        key(KeyCode::Char('l')),
        key(KeyCode::Char('g')),
        ctrl_key('a'),
        key(KeyCode::Esc),
        key(KeyCode::Delete),
        KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::SHIFT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        },
        KeyEvent {
            code: KeyCode::Down,
            modifiers: KeyModifiers::SHIFT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        },
        key(KeyCode::Char('?')),
    ];
    let actions: Vec<Action> = bound
        .into_iter()
        .filter_map(keybindings::map_key)
        .collect();
    for expected in [
        Quit,
        TogglePlayback,
        ScrollForwards,
        ScrollBackwards,
        SeekForwards,
        SeekBackwards,
        SkipToStart,
        SkipToEnd,
        SnapFiner,
        SnapCoarser,
        ZoomIn,
        ZoomOut,
        RateUp,
        RateDown,
        ToggleView,
        ToggleWindowLock,
        CycleGraphics,
        SelectVisible,
        ClearSelection,
        DeleteSelection,
        NudgeForwards,
        NudgeBackwards,
        ToggleHelp,
    ] {
        assert!(actions.contains(&expected), "{expected:?} has no key");
    }
}
