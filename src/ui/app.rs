//! Main TUI application state and logic

use crate::snapshot::{Snapshot, SnapshotManager, Terminal as Output};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane receives scroll keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Scopes,
    Output,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Scopes => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Scopes,
        }
    }
}

/// The main application state
pub struct App {
    /// Recorded execution history
    pub trace: SnapshotManager,

    /// Everything the program printed
    pub output: Output,

    /// The program text being executed
    pub source_code: String,

    /// Message of the error that ended the run, if any
    pub error: Option<String>,

    /// Index of the snapshot on display
    pub position: usize,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub scopes_scroll: usize,
    pub output_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,
}

impl App {
    pub fn new(
        trace: SnapshotManager,
        output: Output,
        source_code: String,
        error: Option<String>,
    ) -> Self {
        let status_message = match &error {
            Some(message) => message.clone(),
            None => String::from("Ready!"),
        };

        App {
            trace,
            output,
            source_code,
            error,
            position: 0,
            focused_pane: FocusedPane::Scopes,
            source_scroll: 0,
            scopes_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if !self.step_forward() {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Snapshot at the current position
    pub fn current(&self) -> Option<&Snapshot> {
        self.trace.get(self.position)
    }

    fn is_last(&self) -> bool {
        self.position + 1 >= self.trace.len()
    }

    /// Output printed before the current step. The final step of a
    /// completed run also shows what that step printed.
    fn visible_output(&self) -> Vec<String> {
        let len = match self.current() {
            Some(_) if self.is_last() && self.error.is_none() => self.output.len(),
            Some(snapshot) => snapshot.output_len,
            None => self.output.len(),
        };
        self.output.lines_up_to(len)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let current_line = self.current().map_or(0, |s| s.location.line);
        let on_error = self.error.is_some() && self.is_last();
        let output_lines = self.visible_output();

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            current_line,
            on_error,
            &mut self.source_scroll,
        );

        super::panes::render_output_pane(
            frame,
            left_rows[1],
            &output_lines,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_scopes_pane(
            frame,
            columns[1],
            self.trace.get(self.position),
            self.focused_pane == FocusedPane::Scopes,
            &mut self.scopes_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.position,
            self.trace.len(),
            on_error,
            self.is_playing,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                if self.step_backward() {
                    self.status_message = "Stepped backward".to_string();
                } else {
                    self.status_message = "Already at the first step".to_string();
                }
            }
            KeyCode::Right => {
                self.is_playing = false;
                if self.step_forward() {
                    self.status_message = "Stepped forward".to_string();
                } else {
                    self.status_message = self.end_message();
                }
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Scopes => self.scopes_scroll = self.scopes_scroll.saturating_sub(1),
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_sub(1),
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Scopes => self.scopes_scroll = self.scopes_scroll.saturating_add(1),
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_add(1),
            },
            KeyCode::Char(' ') => {
                self.is_playing = !self.is_playing;
                if self.is_playing {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.status_message = "Paused".to_string();
                }
            }
            KeyCode::End | KeyCode::Enter => {
                self.is_playing = false;
                self.position = self.trace.len().saturating_sub(1);
                self.output_scroll = usize::MAX;
                self.status_message = self.end_message();
            }
            KeyCode::Home | KeyCode::Backspace => {
                self.is_playing = false;
                self.position = 0;
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    fn end_message(&self) -> String {
        match &self.error {
            Some(message) => message.clone(),
            None => "Execution finished".to_string(),
        }
    }

    /// Move one snapshot forward. Returns false at the end of the trace.
    fn step_forward(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.position += 1;
        // Auto-scroll output to bottom
        self.output_scroll = usize::MAX;
        true
    }

    /// Move one snapshot back. Returns false at the start of the trace.
    fn step_backward(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        self.output_scroll = usize::MAX;
        true
    }
}
