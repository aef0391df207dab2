//! TUI interface — highway, scrub bar and status line over one [`Editor`].
//!
//! The App holds the editor plus the screen geometry of the last draw, which
//! mouse events are resolved against, and drives the event loop.

pub mod highway;
pub mod keybindings;
pub mod status;

pub use highway::{project, Glyph, Highway, Mark};
pub use keybindings::{map_key, Action};
pub use status::StatusInfo;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event as CrosstermEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};
use ratatui::Frame;

use crate::audio::{AudioEngine, AudioError};
use crate::beatmap::{Beatmap, EntityId, View};
use crate::config::EditorConfig;
use crate::editor::{Editor, Frame as EditorFrame};
use crate::playback::PlaybackState;
use crate::selection::PointerButton;
use crate::time::Direction;

/// Input poll timeout; bounds the frame interval when idle.
const FRAME_MS: u64 = 16;

/// Terminal columns per highway lane.
const CELL_WIDTH: u16 = 3;

/// Playback rate change per key press.
const RATE_STEP: f64 = 0.25;

/// The main TUI application state.
pub struct App<E: AudioEngine> {
    pub editor: Editor<E, Beatmap>,
    pub should_quit: bool,
    pub help_visible: bool,
    /// Last error shown in the status line.
    pub message: Option<String>,
    frame: Option<EditorFrame>,
    highway: Option<Highway>,
    highway_area: Rect,
    scrub_area: Rect,
}

impl<E: AudioEngine> App<E> {
    pub fn new(editor: Editor<E, Beatmap>) -> Self {
        Self {
            editor,
            should_quit: false,
            help_visible: false,
            message: None,
            frame: None,
            highway: None,
            highway_area: Rect::default(),
            scrub_area: Rect::default(),
        }
    }

    fn report(&mut self, result: Result<(), AudioError>) {
        if let Err(err) = result {
            tracing::warn!(%err, "audio command failed");
            self.message = Some(err.to_string());
        }
    }

    /// Sample the editor for this frame.
    pub fn update(&mut self, now_ms: f64) {
        match self.editor.frame(now_ms) {
            Ok(frame) => self.frame = Some(frame),
            Err(err) => self.report(Err(err)),
        }
    }

    /// The last sampled frame.
    pub fn frame(&self) -> Option<&EditorFrame> {
        self.frame.as_ref()
    }

    pub fn handle_action(&mut self, action: Action, now_ms: f64) {
        let playback = self.editor.playback_mut();
        let result = match action {
            Action::Quit => {
                self.should_quit = true;
                Ok(())
            }
            Action::TogglePlayback => playback.toggle_playback(),
            Action::ScrollForwards => playback.scroll_through_song(now_ms, Direction::Forwards),
            Action::ScrollBackwards => playback.scroll_through_song(now_ms, Direction::Backwards),
            Action::SeekForwards => playback.seek_forwards(),
            Action::SeekBackwards => playback.seek_backwards(),
            Action::SkipToStart => playback.skip_to_start(),
            Action::SkipToEnd => playback.skip_to_end(),
            Action::SnapFiner => {
                playback.set_snap(playback.snap().finer());
                Ok(())
            }
            Action::SnapCoarser => {
                playback.set_snap(playback.snap().coarser());
                Ok(())
            }
            Action::ZoomIn => {
                match playback.view() {
                    View::Notes => playback.set_zoom(playback.zoom().zoom_in()),
                    View::Events => playback.set_event_zoom(playback.event_zoom().zoom_in()),
                }
                Ok(())
            }
            Action::ZoomOut => {
                match playback.view() {
                    View::Notes => playback.set_zoom(playback.zoom().zoom_out()),
                    View::Events => playback.set_event_zoom(playback.event_zoom().zoom_out()),
                }
                Ok(())
            }
            Action::RateUp => playback.set_playback_rate(playback.playback_rate() + RATE_STEP),
            Action::RateDown => playback.set_playback_rate(playback.playback_rate() - RATE_STEP),
            Action::ToggleView => {
                playback.set_view(playback.view().toggle());
                Ok(())
            }
            Action::ToggleWindowLock => {
                playback.set_window_lock(!playback.window_lock_enabled());
                Ok(())
            }
            Action::CycleGraphics => {
                playback.set_graphics(playback.graphics().cycle());
                Ok(())
            }
            Action::SelectVisible => {
                self.editor.select_visible();
                Ok(())
            }
            Action::ClearSelection => {
                if self.help_visible {
                    self.help_visible = false;
                } else {
                    self.editor.clear_selection();
                }
                Ok(())
            }
            Action::DeleteSelection => {
                self.editor.delete_selection();
                Ok(())
            }
            Action::NudgeForwards => {
                self.editor.nudge_selection(Direction::Forwards);
                Ok(())
            }
            Action::NudgeBackwards => {
                self.editor.nudge_selection(Direction::Backwards);
                Ok(())
            }
            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
                Ok(())
            }
        };
        self.report(result);
    }

    /// Entity drawn under the terminal cell `(column, row)`.
    fn entity_under(&self, column: u16, row: u16) -> Option<EntityId> {
        let area = self.highway_area;
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }
        let lane = usize::from((column - area.x) / CELL_WIDTH);
        self.highway
            .as_ref()?
            .entity_at(usize::from(row - area.y), lane)
    }

    /// Audio time under `column` on the scrub bar, clamped to the bar.
    fn scrub_time(&self, column: u16) -> f64 {
        let area = self.scrub_area;
        let width = area.width.saturating_sub(1).max(1);
        let x = column.clamp(area.x, area.x + width) - area.x;
        f64::from(x) / f64::from(width) * self.editor.playback().duration_ms()
    }

    fn on_scrub_bar(&self, column: u16, row: u16) -> bool {
        let area = self.scrub_area;
        row == area.y && column >= area.x && column < area.right()
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now_ms: f64) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(button) => {
                if self.on_scrub_bar(column, row) {
                    let ms = self.scrub_time(column);
                    let result = self.editor.playback_mut().begin_scrub(ms);
                    self.report(result);
                } else if let Some(id) = self.entity_under(column, row) {
                    self.editor.on_pointer_down(id, pointer_button(button));
                }
            }
            MouseEventKind::Drag(_) => {
                if self.editor.playback().state() == PlaybackState::Scrubbing {
                    let ms = self.scrub_time(column);
                    let result = self.editor.playback_mut().scrub_to(ms);
                    self.report(result);
                } else if let Some(id) = self.entity_under(column, row) {
                    self.editor.on_pointer_over(id);
                }
            }
            MouseEventKind::Up(_) => {
                self.editor.on_global_pointer_up();
                self.editor.playback_mut().end_scrub();
            }
            MouseEventKind::ScrollUp => {
                self.handle_action(Action::ScrollForwards, now_ms);
            }
            MouseEventKind::ScrollDown => {
                self.handle_action(Action::ScrollBackwards, now_ms);
            }
            _ => {}
        }
    }

    /// Current preferences, for saving back to the config file.
    pub fn preferences(&self, base: &EditorConfig) -> EditorConfig {
        let playback = self.editor.playback();
        EditorConfig {
            snap: playback.snap(),
            zoom: playback.zoom().index(),
            event_zoom: playback.event_zoom().index(),
            graphics: playback.graphics(),
            playback_rate: playback.playback_rate(),
            volume: playback.transport().gain(),
            window_lock: playback.window_lock_enabled(),
            ..base.clone()
        }
    }

    pub fn status(&self) -> StatusInfo {
        let playback = self.editor.playback();
        let view = playback.view();
        let mut status = StatusInfo {
            snap: playback.snap(),
            view,
            zoom: match view {
                View::Notes => playback.zoom().beat_depth(),
                View::Events => playback.event_zoom().beats_per_window(),
            },
            graphics: playback.graphics(),
            window_lock: playback.window_lock_enabled(),
            ..StatusInfo::default()
        };
        if let Some(frame) = &self.frame {
            status.time_ms = frame.playback.time_ms;
            status.duration_ms = frame.playback.duration_ms;
            status.beat = frame.playback.beat;
            status.state = frame.playback.state;
            status.playback_rate = frame.playback.playback_rate;
            status.selection_mode = frame.selection_mode;
        }
        status
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Min(3),    // Highway
                Constraint::Length(1), // Scrub bar
                Constraint::Length(1), // Status bar
            ])
            .split(size);

        self.draw_highway(frame, chunks[0]);
        self.draw_scrub_bar(frame, chunks[1]);
        self.draw_status(frame, chunks[2]);

        if self.help_visible {
            self.draw_help(frame, size);
        }
    }

    fn draw_highway(&mut self, frame: &mut Frame, area: Rect) {
        let Some(editor_frame) = &self.frame else {
            frame.render_widget(Block::default().borders(Borders::ALL), area);
            return;
        };

        let columns = highway::columns_for(editor_frame.view) as u16;
        let width = (columns * CELL_WIDTH + 2).min(area.width);
        let x = area.x + (area.width - width) / 2;
        let outer = Rect::new(x, area.y, width, area.height);

        let title = match editor_frame.view {
            View::Notes => " Notes ",
            View::Events => " Events ",
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(outer);
        frame.render_widget(block, outer);

        let projected = project(editor_frame, usize::from(inner.height));
        let lines: Vec<Line> = projected
            .cells
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                let on_cursor = projected.cursor_row == Some(row);
                let spans: Vec<Span> = cells
                    .iter()
                    .map(|cell| match cell {
                        Some(mark) => {
                            let color = match mark.glyph {
                                Glyph::Bomb | Glyph::Wall => Color::Gray,
                                Glyph::Trigger | Glyph::Speed(_) => Color::Green,
                                g if g.is_red() => Color::Red,
                                _ => Color::Blue,
                            };
                            let mut style = Style::default().fg(color);
                            if mark.selected {
                                style = style.add_modifier(Modifier::REVERSED);
                            }
                            if mark.passed {
                                style = style.add_modifier(Modifier::DIM);
                            }
                            Span::styled(format!(" {} ", mark.glyph.symbol()), style)
                        }
                        None if on_cursor => {
                            Span::styled("───", Style::default().fg(Color::Yellow))
                        }
                        None => Span::styled(" · ", Style::default().fg(Color::DarkGray)),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
        self.highway = Some(projected);
        self.highway_area = inner;
    }

    fn draw_scrub_bar(&mut self, frame: &mut Frame, area: Rect) {
        let status = self.status();
        let ratio = if status.duration_ms > 0.0 {
            (status.time_ms / status.duration_ms).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .ratio(ratio)
            .label(status.time_display());
        frame.render_widget(gauge, area);
        self.scrub_area = area;
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let status = self.status();
        let indicator_color = match status.state {
            PlaybackState::Playing => Color::Green,
            PlaybackState::Scrubbing => Color::Yellow,
            PlaybackState::Stopped => Color::Red,
        };

        let mut spans = vec![
            Span::styled(
                format!(" {} ", status.playback_display()),
                Style::default()
                    .fg(indicator_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {} ", status.settings_display())),
        ];
        if let Some(message) = &self.message {
            spans.push(Span::styled(
                format!(" {message} "),
                Style::default().fg(Color::Red),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::Black).fg(Color::White));
        frame.render_widget(paragraph, area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let width = 56.min(area.width);
        let height = (keybindings::HELP.len() as u16 + 2).min(area.height);
        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        let overlay = Rect::new(x, y, width, height);

        let block = Block::default()
            .style(Style::default().bg(Color::Black))
            .borders(Borders::ALL)
            .title(" Keys (? or Esc to close) ");
        let inner = block.inner(overlay);
        frame.render_widget(Clear, overlay);
        frame.render_widget(block, overlay);

        let lines: Vec<Line> = keybindings::HELP
            .iter()
            .map(|(keys, what)| {
                Line::from(vec![
                    Span::styled(format!("{keys:>16} "), Style::default().fg(Color::Yellow)),
                    Span::raw(*what),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Run the TUI event loop.
    pub fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> io::Result<()> {
        let clock = Instant::now();
        let now_ms = || clock.elapsed().as_secs_f64() * 1000.0;

        while !self.should_quit {
            self.update(now_ms());
            terminal
                .draw(|frame| self.draw(frame))
                .map_err(|e| io::Error::other(e.to_string()))?;

            if event::poll(Duration::from_millis(FRAME_MS))? {
                match event::read()? {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = map_key(key) {
                            self.handle_action(action, now_ms());
                        }
                    }
                    CrosstermEvent::Mouse(mouse) => self.handle_mouse(mouse, now_ms()),
                    _ => {}
                }
            }
        }

        Ok(())
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    }
}
