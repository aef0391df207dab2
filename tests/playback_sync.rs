//! Playback integration tests — WAV on disk through the transport and the
//! cursor controller, driven by a headless clock.

use std::path::Path;

use assert_approx_eq::assert_approx_eq;

use beatmapper::audio::{AudioError, AudioTransport, DirectoryStore, HeadlessEngine};
use beatmapper::beatmap::View;
use beatmapper::config::EditorConfig;
use beatmapper::playback::{PlaybackController, PlaybackState, Song};
use beatmapper::time::{Direction, SnapIncrement};

/// Write `seconds` of a quiet 16-bit mono tone at 1 kHz sample rate.
fn write_wav(path: &Path, seconds: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 1_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..seconds * 1_000 {
        let v = ((i as f32) * 0.05).sin() * 1_000.0;
        writer.write_sample(v as i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// 10 s song at 120 BPM (500 ms per beat) loaded from a temp directory.
fn controller(config: &EditorConfig) -> (tempfile::TempDir, PlaybackController<HeadlessEngine>) {
    let dir = tempfile::tempdir().unwrap();
    write_wav(&dir.path().join("song.wav"), 10);

    let store = DirectoryStore::new(dir.path());
    let mut transport = AudioTransport::new(HeadlessEngine::new());
    let duration = transport.load_from(&store, "song.wav").unwrap();
    assert_approx_eq!(duration, 10_000.0);

    let playback = PlaybackController::new(transport, Song::new(120.0, 0.0), config).unwrap();
    (dir, playback)
}

fn advance(c: &mut PlaybackController<HeadlessEngine>, ms: f64) {
    c.transport_mut().engine_mut().advance(ms);
}

#[test]
fn cursor_follows_audio_clock() {
    let (_dir, mut c) = controller(&EditorConfig::default());
    c.play().unwrap();
    advance(&mut c, 1_250.0);

    let frame = c.tick(0.0).unwrap();
    assert_eq!(frame.state, PlaybackState::Playing);
    assert_approx_eq!(frame.time_ms, 1_250.0);
    assert_approx_eq!(frame.beat, 2.5);
}

#[test]
fn rate_change_mid_playback_has_no_jump() {
    let (_dir, mut c) = controller(&EditorConfig::default());
    c.play().unwrap();
    advance(&mut c, 1_000.0);

    c.set_playback_rate(0.5).unwrap();
    assert_approx_eq!(c.current_time_ms(), 1_000.0);

    advance(&mut c, 1_000.0);
    assert_approx_eq!(c.current_time_ms(), 1_500.0);

    // Clamped to the maximum.
    c.set_playback_rate(8.0).unwrap();
    assert_approx_eq!(c.playback_rate(), 2.0);
    assert_approx_eq!(c.current_time_ms(), 1_500.0);
}

#[test]
fn configured_rate_applies_on_load() {
    let config = EditorConfig {
        playback_rate: 1.5,
        volume: 0.5,
        ..EditorConfig::default()
    };
    let (_dir, mut c) = controller(&config);
    assert_approx_eq!(c.transport().engine().gain(), 0.5);

    c.play().unwrap();
    advance(&mut c, 1_000.0);
    assert_approx_eq!(c.current_time_ms(), 1_500.0);
}

#[test]
fn playback_stops_at_end_and_restarts_from_zero() {
    let (_dir, mut c) = controller(&EditorConfig::default());
    c.seek_ms(9_500.0).unwrap();
    c.play().unwrap();
    advance(&mut c, 2_000.0);

    let frame = c.tick(0.0).unwrap();
    assert_eq!(frame.state, PlaybackState::Stopped);
    assert_approx_eq!(frame.time_ms, 10_000.0);

    c.play().unwrap();
    assert!(c.is_playing());
    assert_approx_eq!(c.current_time_ms(), 0.0);
}

#[test]
fn seek_is_clamped_to_the_track() {
    let (_dir, mut c) = controller(&EditorConfig::default());
    c.seek_ms(-500.0).unwrap();
    assert_approx_eq!(c.current_time_ms(), 0.0);
    c.seek_beat(100.0).unwrap();
    assert_approx_eq!(c.current_time_ms(), 10_000.0);
}

#[test]
fn throttled_scroll_lands_on_later_tick() {
    let (_dir, mut c) = controller(&EditorConfig::default());
    c.set_snap(SnapIncrement::One);

    c.scroll_through_song(0.0, Direction::Forwards).unwrap();
    c.scroll_through_song(10.0, Direction::Forwards).unwrap();
    c.scroll_through_song(20.0, Direction::Forwards).unwrap();
    assert_approx_eq!(c.current_beat(), 1.0);

    c.tick(30.0).unwrap();
    assert_approx_eq!(c.current_beat(), 1.0);
    c.tick(60.0).unwrap();
    assert_approx_eq!(c.current_beat(), 2.0);
}

#[test]
fn scrub_gesture_holds_position() {
    let (_dir, mut c) = controller(&EditorConfig::default());
    c.play().unwrap();
    c.begin_scrub(2_000.0).unwrap();
    assert_eq!(c.state(), PlaybackState::Scrubbing);
    assert!(!c.transport().is_playing());

    c.scrub_to(4_000.0).unwrap();
    advance(&mut c, 5_000.0);
    c.end_scrub();
    assert_eq!(c.state(), PlaybackState::Stopped);
    assert_approx_eq!(c.current_time_ms(), 4_000.0);
}

#[test]
fn window_lock_pins_events_view_to_boundaries() {
    let config = EditorConfig {
        window_lock: true,
        ..EditorConfig::default()
    };
    let (_dir, mut c) = controller(&config);
    c.set_view(View::Events);
    c.seek_beat(15.5).unwrap();
    c.play().unwrap();

    c.tick(0.0).unwrap();
    advance(&mut c, 500.0);
    let frame = c.tick(16.0).unwrap();
    assert_approx_eq!(frame.beat, 16.0);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::new(dir.path());
    let mut transport = AudioTransport::new(HeadlessEngine::new());

    let err = transport.load_from(&store, "absent.wav").unwrap_err();
    assert!(matches!(err, AudioError::Read { ref name, .. } if name == "absent.wav"));
    assert!(!transport.is_loaded());
}
