//! Beatmapper binary — inspect a song or edit its map in the terminal.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use beatmapper::audio::{AudioEngine, AudioTransport, CpalEngine, DirectoryStore, HeadlessEngine};
use beatmapper::beatmap::{
    Beatmap, CutDirection, EventTrack, LightColor, LightEffect, LightingEvent, Note, NoteColor,
    Obstacle, ObstacleKind,
};
use beatmapper::config::EditorConfig;
use beatmapper::editor::Editor;
use beatmapper::playback::{PlaybackController, Song};
use beatmapper::time::format_time;
use beatmapper::tui::App;
use clap::{Parser, Subcommand};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Beat-synchronized beatmap editor", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.beatmapper/config.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the duration and beat count of a song.
    Info {
        /// WAV file to inspect.
        audio: PathBuf,
        /// Song tempo in beats per minute.
        #[arg(long)]
        bpm: f64,
        /// Audio time of beat 0, in milliseconds.
        #[arg(long, default_value_t = 0.0)]
        offset: f64,
    },
    /// Open the terminal editor.
    Edit {
        /// WAV file to play.
        audio: PathBuf,
        #[arg(long)]
        bpm: f64,
        #[arg(long, default_value_t = 0.0)]
        offset: f64,
        /// Fill the map with a generated pattern.
        #[arg(long)]
        demo_notes: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(EditorConfig::default_path);

    let result = match cli.command {
        Commands::Info { audio, bpm, offset } => {
            init_tracing(None);
            run_info(&audio, Song::new(bpm, offset))
        }
        Commands::Edit {
            audio,
            bpm,
            offset,
            demo_notes,
        } => {
            init_tracing(config_path.parent().map(|dir| dir.join("beatmapper.log")));
            run_edit(&audio, Song::new(bpm, offset), demo_notes, &config_path)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "exiting");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Log to `file` when given, otherwise to stderr. The TUI owns stdout, so
/// the editor always logs to a file.
fn init_tracing(file: Option<PathBuf>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let opened = file.and_then(|path| {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).ok()?;
        }
        File::create(path).ok()
    });
    let _ = match opened {
        Some(file) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
}

/// Split a path into a blob store rooted at its directory and the file name.
fn store_for(path: &Path) -> Result<(DirectoryStore, String), BoxError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("not a file path: {}", path.display()))?;
    let root = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((DirectoryStore::new(root), name.to_string()))
}

fn load<E: AudioEngine>(transport: &mut AudioTransport<E>, path: &Path) -> Result<f64, BoxError> {
    let (store, name) = store_for(path)?;
    Ok(transport.load_from(&store, &name)?)
}

fn run_info(path: &Path, song: Song) -> Result<(), BoxError> {
    let mut transport = AudioTransport::new(HeadlessEngine::new());
    let duration = load(&mut transport, path)?;
    let Some(clip) = transport.clip() else {
        return Err("no clip loaded".into());
    };

    println!("file:        {}", path.display());
    println!("duration:    {} ({duration:.0} ms)", format_time(duration));
    println!("sample rate: {} Hz", clip.sample_rate());
    println!("channels:    {}", clip.channels());
    println!(
        "beats:       {:.2} at {} BPM",
        song.beat_at(duration),
        song.bpm
    );
    Ok(())
}

fn run_edit(path: &Path, song: Song, demo_notes: bool, config_path: &Path) -> Result<(), BoxError> {
    let config = EditorConfig::load_or_default(config_path);
    tracing::info!(audio = %path.display(), bpm = song.bpm, "starting editor");

    let mut transport = AudioTransport::new(CpalEngine::new()?);
    let duration = load(&mut transport, path)?;

    let mut map = Beatmap::new();
    if demo_notes {
        let beats = song.beat_at(duration).floor().max(0.0);
        demo_pattern(&mut map, beats);
        tracing::info!(entities = map.len(), "generated demo pattern");
    }

    let playback = PlaybackController::new(transport, song, &config)?;
    let mut app = App::new(Editor::new(playback, map));

    let mut terminal = ratatui::init();
    let _ = crossterm::execute!(std::io::stdout(), EnableMouseCapture);
    let result = app.run(&mut terminal);
    let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result?;

    let preferences = app.preferences(&config);
    if let Err(err) = preferences.save(config_path) {
        tracing::warn!(%err, "could not save preferences");
    }
    Ok(())
}

/// Alternating blocks on every beat, a bomb every 4 bars, a wall every 8 and
/// lighting on the downbeats.
fn demo_pattern(map: &mut Beatmap, beats: f64) {
    const DIRECTIONS: [CutDirection; 4] = [
        CutDirection::Down,
        CutDirection::Up,
        CutDirection::Left,
        CutDirection::Right,
    ];

    let mut beat = 4.0;
    let mut i: usize = 0;
    while beat < beats {
        let (color, lane) = if i % 2 == 0 {
            (NoteColor::Red, 1)
        } else {
            (NoteColor::Blue, 2)
        };
        map.add_note(beat, Note::block(color, lane, 0, DIRECTIONS[i % 4]));

        if i % 16 == 15 {
            map.add_note(beat + 0.5, Note::bomb(0, 0));
        }
        if i % 32 == 31 {
            map.add_obstacle(
                beat + 0.5,
                Obstacle {
                    kind: ObstacleKind::Wall,
                    line_index: 3,
                    width: 1,
                    duration: 2.0,
                },
            );
        }
        if i % 4 == 0 {
            let color = if i % 8 == 0 {
                LightColor::Red
            } else {
                LightColor::Blue
            };
            map.add_event(
                beat,
                LightingEvent::light(EventTrack::BackLasers, LightEffect::Flash, color),
            );
            map.add_event(beat, LightingEvent::trigger(EventTrack::RingRotation));
        }

        beat += 1.0;
        i += 1;
    }
}
