//! TUI (Terminal User Interface) module for the hangman game
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Architecture
//! - `TuiInterface`: renders a [`GameSession`] and turns key presses into
//!   [`UserAction`]s for the game loop
//!
//! # State Machine
//! The view is derived from the session on every frame:
//! - `Playing` → `PuzzleOver` (won or lost) → back to `Playing` on the next puzzle
//! - Terminal state: `SessionComplete`, left only by restart or exit

use crate::game_state::{GameInterface, UserAction};
use crate::notify::GameEvent;
use crate::puzzle::PuzzleRecord;
use crate::session::{GameSession, PuzzleStatus};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
const GALLOWS_STAGES: u32 = 10;
const GALLOWS_WIDTH: usize = 10;
const GALLOWS_HEIGHT: usize = 7;
const KEYBOARD_ROWS: [&str; 2] = ["ABCDEFGHIJKLM", "NOPQRSTUVWXYZ"];

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

/// (stage, first row, last row, first column, last column, glyph)
const GALLOWS_PARTS: [(u32, usize, usize, usize, usize, char); 12] = [
    (1, 6, 6, 0, 6, '='),
    (2, 0, 5, 2, 2, '|'),
    (3, 0, 0, 3, 7, '-'),
    (3, 0, 0, 2, 2, '+'),
    (3, 0, 0, 8, 8, '+'),
    (4, 1, 1, 8, 8, '|'),
    (5, 2, 2, 8, 8, 'O'),
    (6, 3, 3, 8, 8, '|'),
    (7, 3, 3, 7, 7, '/'),
    (8, 3, 3, 9, 9, '\\'),
    (9, 4, 4, 7, 7, '/'),
    (10, 4, 4, 9, 9, '\\'),
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum TuiState {
    Playing,
    PuzzleOver,
    SessionComplete,
}

impl TuiState {
    fn of(session: &GameSession) -> Self {
        if session.is_complete() {
            Self::SessionComplete
        } else if session.status().is_finished() {
            Self::PuzzleOver
        } else {
            Self::Playing
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum KeyState {
    Unused,
    Hit,
    Miss,
}

impl KeyState {
    fn colors(self) -> (Color, Color) {
        match self {
            Self::Unused => (Color::DarkGray, Color::White),
            Self::Hit => (Color::Green, Color::Black),
            Self::Miss => (Color::Red, Color::White),
        }
    }
}

/// Gallows stage for a wrong-guess count, scaled so the figure completes on the last allowed miss.
fn gallows_stage(wrong: u32, max_wrong: u32) -> u32 {
    if max_wrong == 0 {
        return GALLOWS_STAGES;
    }
    (wrong * GALLOWS_STAGES / max_wrong).min(GALLOWS_STAGES)
}

fn gallows_lines(stage: u32) -> Vec<String> {
    let mut grid = [[' '; GALLOWS_WIDTH]; GALLOWS_HEIGHT];
    for &(part_stage, r0, r1, c0, c1, glyph) in &GALLOWS_PARTS {
        if part_stage > stage {
            continue;
        }
        for row in grid.iter_mut().take(r1 + 1).skip(r0) {
            for cell in row.iter_mut().take(c1 + 1).skip(c0) {
                *cell = glyph;
            }
        }
    }
    grid.iter().map(|row| row.iter().collect()).collect()
}

fn key_state(session: &GameSession, letter: char) -> KeyState {
    if !session.guessed_letters().contains(&letter) {
        return KeyState::Unused;
    }
    match session.current_puzzle() {
        Some(puzzle) if puzzle.contains_letter(letter) => KeyState::Hit,
        _ => KeyState::Miss,
    }
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    session: &'a GameSession,
    state: TuiState,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Tracks whether the terminal has been handed back, so teardown runs once.
#[derive(Debug, Default)]
struct ScreenGuard {
    restored: bool,
}

impl ScreenGuard {
    /// True only on the first call.
    fn begin_restore(&mut self) -> bool {
        !std::mem::replace(&mut self.restored, true)
    }
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    message: String,
    error_message: String,
    status: String,
    screen: ScreenGuard,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
            screen: ScreenGuard::default(),
        })
    }

    /// Leave raw mode and the alternate screen. Only the first call does anything.
    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        if !self.screen.begin_restore() {
            return Ok(());
        }
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    ///
    /// Returns an error if rendering fails.
    fn draw(&mut self, session: &GameSession) -> Result<(), io::Error> {
        let ctx = RenderContext {
            session,
            state: TuiState::of(session),
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self, session: &GameSession) {
        if let Err(e) = self.draw(session) {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Render the complete UI layout using the provided context.
    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Title
                Constraint::Min(11),    // Gallows and puzzle
                Constraint::Length(4),  // Keyboard
                Constraint::Length(3),  // Statistics
                Constraint::Length(3),  // Status line
                Constraint::Length(3),  // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0], ctx.session);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(18), Constraint::Min(20)])
            .split(chunks[1]);
        Self::render_gallows(f, middle[0], ctx.session);
        match ctx.state {
            TuiState::SessionComplete => Self::render_summary(f, middle[1], ctx.session),
            TuiState::Playing | TuiState::PuzzleOver => {
                Self::render_puzzle(f, middle[1], ctx);
            }
        }

        Self::render_keyboard(f, chunks[2], ctx.session);
        Self::render_stats(f, chunks[3], ctx.session);
        Self::render_status(f, chunks[4], ctx.status);
        Self::render_instructions(f, chunks[5], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect, session: &GameSession) {
        let puzzles = session.puzzles();
        let progress = if session.is_complete() {
            "complete".to_string()
        } else {
            format!("puzzle {}/{}", session.current_index() + 1, puzzles.len())
        };
        let title = Paragraph::new(format!(
            "STUDY HANGMAN - {} - {progress}",
            puzzles.difficulty()
        ))
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_gallows(f: &mut Frame, area: Rect, session: &GameSession) {
        let stage = gallows_stage(
            session.wrong_guess_count(),
            session.config().max_wrong_guesses,
        );
        let style = if session.status() == PuzzleStatus::Lost {
            ERROR_STYLE
        } else {
            Style::default()
        };
        let lines: Vec<Line> = gallows_lines(stage)
            .into_iter()
            .map(|l| Line::from(Span::styled(format!("  {l}"), style)))
            .collect();
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(format!(
                    "Misses {}/{}",
                    session.wrong_guess_count(),
                    session.config().max_wrong_guesses
                ))
                .borders(Borders::ALL),
        );
        f.render_widget(paragraph, area);
    }

    fn render_puzzle(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let session = ctx.session;
        let Some(puzzle) = session.current_puzzle() else {
            return;
        };
        let mut lines = vec![
            Line::from(Span::styled("Question:", HEADER_STYLE)),
            Line::from(puzzle.prompt().to_string()),
            Line::from(""),
        ];

        let word_style = match session.status() {
            PuzzleStatus::Won => SUCCESS_STYLE,
            PuzzleStatus::Lost => ERROR_STYLE,
            PuzzleStatus::Playing => Style::default().add_modifier(Modifier::BOLD),
        };
        lines.push(Line::from(Span::styled(
            format!("  {}", crate::cli::spaced(&session.masked_answer())),
            word_style,
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", answer_shape(puzzle)),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));

        if session.hint_revealed() {
            lines.push(Line::from(vec![
                Span::styled("Hint: ", INFO_STYLE),
                Span::raw(puzzle.hint().to_string()),
            ]));
        } else {
            lines.push(Line::from(Span::styled(
                "Hint hidden - press ? to reveal it",
                Style::default().fg(Color::DarkGray),
            )));
        }

        match session.status() {
            PuzzleStatus::Won => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Solved!", SUCCESS_STYLE)));
            }
            PuzzleStatus::Lost => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("Out of guesses. The answer was {}", puzzle.answer()),
                    ERROR_STYLE,
                )));
            }
            PuzzleStatus::Playing => {}
        }

        if !ctx.message.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(ctx.message, MESSAGE_STYLE)));
        }
        if !ctx.error_message.is_empty() {
            lines.push(Line::from(Span::styled(ctx.error_message, ERROR_STYLE)));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Puzzle").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_summary(f: &mut Frame, area: Rect, session: &GameSession) {
        let stats = session.stats();
        let hints = match stats.hints_used {
            0 => "Great job! No hints needed".to_string(),
            1 => "You used 1 hint".to_string(),
            n => format!("You used {n} hints"),
        };
        let lines = vec![
            Line::from(Span::styled(
                format!(
                    "Congratulations! You completed all {} level words!",
                    session.puzzles().difficulty()
                ),
                SUCCESS_STYLE,
            )),
            Line::from(""),
            Line::from(format!("Final score: {}", session.score())),
            Line::from(format!(
                "Words solved: {}/{}",
                stats.words_completed, stats.total_words
            )),
            Line::from(format!("{}% of your guesses were correct", stats.accuracy())),
            Line::from(hints),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Session Complete").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_keyboard(f: &mut Frame, area: Rect, session: &GameSession) {
        let lines: Vec<Line> = KEYBOARD_ROWS
            .iter()
            .map(|row| {
                let mut spans = vec![Span::raw(" ")];
                for letter in row.chars() {
                    let (bg, fg) = key_state(session, letter).colors();
                    spans.push(Span::styled(
                        format!(" {letter} "),
                        Style::default().fg(fg).bg(bg),
                    ));
                    spans.push(Span::raw(" "));
                }
                Line::from(spans)
            })
            .collect();
        let paragraph =
            Paragraph::new(lines).block(Block::default().title("Letters").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_stats(f: &mut Frame, area: Rect, session: &GameSession) {
        let stats = session.stats();
        let text = format!(
            "Score: {} | Words: {}/{} | Correct: {} | Wrong: {} | Hints: {} | Accuracy: {}%",
            session.score(),
            stats.words_completed,
            stats.total_words,
            stats.correct_guesses,
            stats.wrong_guesses,
            stats.hints_used,
            stats.accuracy()
        );
        let paragraph = Paragraph::new(text)
            .style(INFO_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Statistics"));
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::Playing => "A-Z: Guess | ?: Hint | F2: Sound | F5: Restart | ESC: Quit",
            TuiState::PuzzleOver => "ENTER: Next puzzle | ?: Hint | R: Restart | S: Sound | ESC: Quit",
            TuiState::SessionComplete => "R: Restart level | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self, state: TuiState) -> Result<Option<UserAction>, io::Error> {
        // Poll with a timeout to check if events are available
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        let Event::Key(key) = event::read()? else {
            // Mouse, focus, paste and resize events carry no game input
            return Ok(None);
        };

        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != event::KeyEventKind::Press {
            return Ok(None);
        }

        // Alt-tab can leak replacement and control characters into the stream
        if let KeyCode::Char(c) = key.code
            && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
        {
            debug_log!("handle_input() - Ignoring invalid character: {:?}", c);
            return Ok(None);
        }

        debug_log!(
            "handle_input() - Key event received: code={:?}, modifiers={:?}, state={:?}",
            key.code,
            key.modifiers,
            state
        );
        Ok(match state {
            TuiState::Playing => self.handle_playing_input(key),
            TuiState::PuzzleOver => Self::handle_puzzle_over_input(key),
            TuiState::SessionComplete => Self::handle_complete_input(key),
        })
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
    }

    fn handle_playing_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();
        if Self::has_modifier_keys(&key) {
            debug_log!("handle_playing_input() - Ignoring key with modifier: {:?}", key.modifiers);
            return None;
        }
        match key.code {
            KeyCode::Char(c) if c.is_ascii_alphabetic() => Some(UserAction::Guess(c.to_ascii_uppercase())),
            KeyCode::Char('?') | KeyCode::F(1) => Some(UserAction::Hint),
            KeyCode::F(2) => Some(UserAction::ToggleSound),
            KeyCode::F(5) => Some(UserAction::Restart),
            KeyCode::Esc => Some(UserAction::Exit),
            KeyCode::Char(c) => {
                self.error_message = format!("Only letters can be guessed! ('{c}' is not a letter)");
                None
            }
            _ => None,
        }
    }

    fn handle_puzzle_over_input(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('n' | 'N' | ' ') => Some(UserAction::Next),
            KeyCode::Char('?') | KeyCode::F(1) => Some(UserAction::Hint),
            KeyCode::Char('r' | 'R') | KeyCode::F(5) => Some(UserAction::Restart),
            KeyCode::Char('s' | 'S') | KeyCode::F(2) => Some(UserAction::ToggleSound),
            KeyCode::Esc | KeyCode::Char('q' | 'Q') => Some(UserAction::Exit),
            _ => None,
        }
    }

    fn handle_complete_input(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('r' | 'R') | KeyCode::F(5) => Some(UserAction::Restart),
            KeyCode::Esc | KeyCode::Char('q' | 'Q') => Some(UserAction::Exit),
            _ => None,
        }
    }

    fn update_status(&mut self, session: &GameSession) {
        self.status = match TuiState::of(session) {
            TuiState::Playing => format!(
                "Guess a letter - {} guesses left",
                session
                    .config()
                    .max_wrong_guesses
                    .saturating_sub(session.wrong_guess_count())
            ),
            TuiState::PuzzleOver if session.is_last_puzzle() => {
                "Last puzzle finished - press ENTER to see your results".to_string()
            }
            TuiState::PuzzleOver => format!(
                "{} words remaining - press ENTER to continue",
                session.words_remaining()
            ),
            TuiState::SessionComplete => "All puzzles complete".to_string(),
        };
    }
}

impl GameInterface for TuiInterface {
    fn show_session(&mut self, session: &GameSession) {
        self.update_status(session);
        self.draw_or_log(session);
    }

    fn read_action(&mut self, session: &GameSession) -> Option<UserAction> {
        let state = TuiState::of(session);
        loop {
            if self.draw(session).is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }

            match self.handle_input(state) {
                Ok(Some(action)) => {
                    info_log!("read_action() - Action received: {:?}", action);
                    return Some(action);
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("Error reading terminal input: {e}");
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn show_events(&mut self, session: &GameSession, events: &[GameEvent]) {
        self.message = event_message(session, events);
        self.error_message.clear();
        self.update_status(session);
        self.draw_or_log(session);
    }

    fn show_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    fn show_session_complete(&mut self, session: &GameSession) {
        self.message.clear();
        self.update_status(session);
        self.draw_or_log(session);
    }

    fn show_exit_message(&mut self) {
        self.status = "Exiting application...".to_string();
    }
}

/// Letter count, and word count for phrases.
fn answer_shape(puzzle: &PuzzleRecord) -> String {
    let letters = puzzle.guessable_letters().count();
    if puzzle.is_phrase() {
        let words = puzzle.answer().split(' ').count();
        format!("{words} words, {letters} letters")
    } else {
        format!("{letters} letters")
    }
}

/// Message line for a batch of events. Replaces whatever the previous batch said.
fn event_message(session: &GameSession, events: &[GameEvent]) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::CorrectGuess(c) => Some(format!("Yes! '{c}' is in the answer.")),
            GameEvent::WrongGuess(c) => Some(format!("Sorry, no '{c}'.")),
            GameEvent::HintRevealed => Some("Hint revealed.".to_string()),
            GameEvent::PuzzleWon => Some("Well done!".to_string()),
            GameEvent::PuzzleLost => Some("Better luck on the next one.".to_string()),
            GameEvent::PuzzleStarted(index) => Some(format!(
                "Puzzle {} of {}.",
                index + 1,
                session.puzzles().len()
            )),
            GameEvent::SessionRestarted => Some("Session restarted.".to_string()),
            GameEvent::SessionComplete => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
