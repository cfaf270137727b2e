//! Trace viewer state and event loop

use crate::errors::ParseError;
use crate::snapshot::{Action, ParseSnapshot, Trace};
use crate::ui::panes::{self, SourceScrollState};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Delay between steps in play mode
const PLAY_INTERVAL: Duration = Duration::from_millis(250);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Stack,
    Symbols,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> stack -> symbols)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Symbols,
            FocusedPane::Symbols => FocusedPane::Source,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Symbols,
            FocusedPane::Stack => FocusedPane::Source,
            FocusedPane::Symbols => FocusedPane::Stack,
        }
    }
}

/// The main application state
pub struct App {
    pub trace: Trace,
    pub source_code: String,
    /// Terminal names of the grammar, to tell them apart on the stack
    pub terminals: Vec<String>,
    /// Index of the snapshot on screen
    pub position: usize,
    /// Error that ended the parse, if any
    pub failure: Option<ParseError>,

    pub focused_pane: FocusedPane,
    pub source_scroll: SourceScrollState,
    pub stack_scroll: usize,
    pub symbols_scroll: usize,

    pub should_quit: bool,
    pub status_message: String,
    pub is_playing: bool,
    pub last_play_time: Instant,
    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(
        trace: Trace,
        source_code: String,
        terminals: Vec<String>,
        failure: Option<ParseError>,
    ) -> Self {
        let status_message = if trace.is_truncated() {
            "Trace truncated: memory limit reached".to_string()
        } else {
            "Ready!".to_string()
        };
        let now = Instant::now();
        App {
            trace,
            source_code,
            terminals,
            position: 0,
            failure,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState {
                offset: 0,
                target_line_row: None,
            },
            stack_scroll: 0,
            symbols_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: now,
            last_space_press: now.checked_sub(Duration::from_secs(1)).unwrap_or(now),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                if self.step_forward() {
                    self.status_message = "Playing...".to_string();
                } else {
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

    pub fn current(&self) -> Option<&ParseSnapshot> {
        self.trace.get(self.position)
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[1]);

        let snapshot = self.trace.get(self.position);
        let (line, is_error) = self.marked_line();

        panes::render_source_pane(
            frame,
            columns[0],
            &self.source_code,
            line,
            is_error,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_stack_pane(
            frame,
            right_rows[0],
            snapshot,
            &self.terminals,
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        panes::render_symbols_pane(
            frame,
            right_rows[1],
            snapshot,
            self.focused_pane == FocusedPane::Symbols,
            &mut self.symbols_scroll,
        );

        let message = match (&self.failure, self.is_at_end()) {
            (Some(failure), true) => failure.to_string(),
            _ => self.status_message.clone(),
        };
        panes::render_status_bar(
            frame,
            main_chunks[1],
            &message,
            self.position,
            self.trace.len(),
            self.failure.is_some(),
            self.is_playing,
        );
    }

    /// Source line to mark and whether it is the failing one. On the last
    /// step the error's own line wins over the snapshot's.
    fn marked_line(&self) -> (usize, bool) {
        let snapshot = self.trace.get(self.position);
        let line = snapshot.map_or(0, |s| s.line);
        match (&self.failure, self.is_at_end()) {
            (Some(failure), true) => (failure.line().unwrap_or(line), true),
            _ => (
                line,
                snapshot.is_some_and(|s| matches!(s.action, Action::Reject { .. })),
            ),
        }
    }

    fn is_at_end(&self) -> bool {
        self.position + 1 >= self.trace.len()
    }

    /// Advance one snapshot. Returns false at the end of the trace.
    fn step_forward(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.position += 1;
        true
    }

    fn step_backward(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let stepped = (0..n).take_while(|_| self.step_forward()).count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.status_message = if self.step_backward() {
                    "Stepped backward".to_string()
                } else {
                    "Already at the first step".to_string()
                };
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.status_message = if self.step_forward() {
                    "Stepped forward".to_string()
                } else {
                    "Already at the last step".to_string()
                };
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Stack => self.stack_scroll = self.stack_scroll.saturating_sub(1),
                FocusedPane::Symbols => {
                    self.symbols_scroll = self.symbols_scroll.saturating_sub(1)
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Stack => self.stack_scroll = self.stack_scroll.saturating_add(1),
                FocusedPane::Symbols => {
                    self.symbols_scroll = self.symbols_scroll.saturating_add(1)
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    self.status_message = if self.is_playing {
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.position = self.trace.len().saturating_sub(1);
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.position = 0;
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalyzerConfig, TRACE_MEMORY_LIMIT};
    use crate::errors::CompileError;
    use crate::pipeline::Frontend;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        let frontend = Frontend::with_default_grammar(&AnalyzerConfig::default()).unwrap();
        let mut trace = Trace::new(TRACE_MEMORY_LIMIT);
        let source = "void main(void) { }";
        frontend.check_traced(source, &mut trace).unwrap();
        App::new(
            trace,
            source.to_string(),
            frontend.grammar().terminals().to_vec(),
            None,
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_focus_cycles() {
        let pane = FocusedPane::Source;
        assert_eq!(pane.next().next().next(), pane);
        assert_eq!(pane.next().prev(), pane);
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = app();
        let last = app.trace.len() - 1;

        press(&mut app, KeyCode::Left);
        assert_eq!(app.position, 0);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.position, 3);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.position, last);
        assert_eq!(app.current().unwrap().action, Action::Accept);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.position, last);

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.position, 0);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_failure_marks_its_line() {
        let frontend = Frontend::with_default_grammar(&AnalyzerConfig::default()).unwrap();
        let mut trace = Trace::new(TRACE_MEMORY_LIMIT);
        let source = "void main(void) {\n  int x;\n  y = 1;\n}";
        let failure = match frontend.check_traced(source, &mut trace) {
            Err(CompileError::Parse(e)) => e,
            other => panic!("expected a parse error, got {:?}", other.map(|_| ())),
        };
        let mut app = App::new(
            trace,
            source.to_string(),
            frontend.grammar().terminals().to_vec(),
            Some(failure),
        );
        assert_eq!(app.marked_line(), (1, false));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.marked_line(), (3, true));
    }
}
