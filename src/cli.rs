use clap::Parser;
use crate::game_state::{GameInterface, UserAction};
use crate::generator::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiConfig};
use crate::notify::GameEvent;
use crate::puzzle::Difficulty;
use crate::session::{
    DEFAULT_HINT_AFTER, DEFAULT_MAX_WRONG_GUESSES, DEFAULT_POINTS_PER_LETTER, GameConfig,
    GameSession, PuzzleStatus, SessionStats,
};
use std::io::BufRead;
use std::path::PathBuf;

/// Turn study notes into hangman puzzles and play them in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// PDF or plain-text document to generate puzzles from
    #[arg(short = 'i', long = "input", conflicts_with = "sample")]
    pub input: Option<PathBuf>,

    /// Play a bundled sample instead of a document
    #[arg(short = 's', long = "sample")]
    pub sample: Option<String>,

    /// List the bundled samples and exit
    #[arg(long = "list-samples")]
    pub list_samples: bool,

    #[arg(short = 'd', long = "difficulty", value_enum, default_value_t = Difficulty::Easy)]
    pub difficulty: Difficulty,

    /// Gemini API key used to generate puzzles from documents
    #[arg(long = "api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long = "model", env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long = "endpoint", env = "GEMINI_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long = "max-wrong-guesses", default_value_t = DEFAULT_MAX_WRONG_GUESSES,
          value_parser = clap::value_parser!(u32).range(1..=26))]
    pub max_wrong_guesses: u32,

    #[arg(long = "points-per-letter", default_value_t = DEFAULT_POINTS_PER_LETTER)]
    pub points_per_letter: u32,

    /// Wrong guesses before the hint is shown automatically
    #[arg(long = "hint-after", default_value_t = DEFAULT_HINT_AFTER)]
    pub hint_after: u32,

    /// Seed for puzzle order and prompt variation
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Use the line-based interface instead of the full-screen one
    #[arg(long = "plain")]
    pub plain: bool,

    /// Start with sound cues off
    #[arg(long = "mute")]
    pub mute: bool,

    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            max_wrong_guesses: self.max_wrong_guesses,
            points_per_letter: self.points_per_letter,
            hint_after: self.hint_after,
        }
    }

    #[must_use]
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

fn parse_action(input: &str) -> Option<UserAction> {
    let input = input.trim().to_uppercase();
    match input.as_str() {
        "EXIT" | "QUIT" => Some(UserAction::Exit),
        "HINT" | "?" => Some(UserAction::Hint),
        "NEXT" => Some(UserAction::Next),
        "RESTART" => Some(UserAction::Restart),
        "SOUND" => Some(UserAction::ToggleSound),
        _ => {
            let mut chars = input.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => Some(UserAction::Guess(c)),
                _ => None,
            }
        }
    }
}

/// Letters spaced out so the blanks can be counted.
#[must_use]
pub fn spaced(masked: &str) -> String {
    masked
        .chars()
        .map(|c| if c == ' ' { "  ".to_string() } else { format!("{c} ") })
        .collect::<String>()
        .trim_end()
        .to_string()
}

pub fn display_stats(stats: &SessionStats, score: u32) {
    println!(
        "Score: {score} | Words: {}/{} | Correct: {} | Wrong: {} | Hints: {} | Accuracy: {}%",
        stats.words_completed,
        stats.total_words,
        stats.correct_guesses,
        stats.wrong_guesses,
        stats.hints_used,
        stats.accuracy()
    );
}

pub fn display_puzzle(session: &GameSession) {
    let Some(puzzle) = session.current_puzzle() else {
        return;
    };
    println!(
        "\nPuzzle {}/{} ({})",
        session.current_index() + 1,
        session.puzzles().len(),
        puzzle.difficulty()
    );
    println!("Q: {}", puzzle.prompt());
    if session.hint_revealed() {
        println!("Hint: {}", puzzle.hint());
    }
    println!("{}", spaced(&session.masked_answer()));
    let guessed: String = session.guessed_letters().iter().collect();
    println!(
        "Guessed: {} | Wrong: {}/{}",
        if guessed.is_empty() { "-" } else { &guessed },
        session.wrong_guess_count(),
        session.config().max_wrong_guesses
    );
}

pub fn display_events(session: &GameSession, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::CorrectGuess(c) => println!("Yes! '{c}' is in the answer."),
            GameEvent::WrongGuess(c) => println!("Sorry, no '{c}'."),
            GameEvent::HintRevealed => {
                if let Some(puzzle) = session.current_puzzle() {
                    println!("Hint: {}", puzzle.hint());
                }
            }
            GameEvent::PuzzleWon | GameEvent::PuzzleLost => display_outcome(session),
            GameEvent::PuzzleStarted(index) => {
                println!("\nPuzzle {} of {}", index + 1, session.puzzles().len());
            }
            GameEvent::SessionRestarted => println!("Session restarted."),
            GameEvent::SessionComplete => {}
        }
    }
}

fn display_outcome(session: &GameSession) {
    let Some(puzzle) = session.current_puzzle() else {
        return;
    };
    match session.status() {
        PuzzleStatus::Won => println!("Solved: {}", puzzle.answer()),
        PuzzleStatus::Lost => println!("Out of guesses. The answer was: {}", puzzle.answer()),
        PuzzleStatus::Playing => return,
    }
    display_stats(session.stats(), session.score());
    if session.is_last_puzzle() {
        println!("That was the last puzzle. Type 'next' to finish.");
    } else {
        println!("{} words remaining. Type 'next' to continue.", session.words_remaining());
    }
}

pub fn display_session_complete(session: &GameSession) {
    println!(
        "\nCongratulations! You completed all {} level words!",
        session.puzzles().difficulty()
    );
    display_stats(session.stats(), session.score());
    println!("Type 'restart' to play again or 'exit' to quit.");
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// CLI implementation of the GameInterface trait
/// This struct wraps a BufRead reader and reads one command per line
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn show_session(&mut self, session: &GameSession) {
        display_puzzle(session);
    }

    fn read_action(&mut self, session: &GameSession) -> Option<UserAction> {
        if session.is_complete() {
            println!("\nEnter 'restart' or 'exit':");
        } else if session.status().is_finished() {
            println!("\nEnter 'next', 'restart' or 'exit':");
        } else {
            println!("\nGuess a letter ('hint', 'restart', 'sound' or 'exit'):");
        }
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => return Some(UserAction::Exit),
            Ok(_) => {}
            Err(e) => {
                log::error!("Failed to read input: {e}");
                return Some(UserAction::Exit);
            }
        }
        let action = parse_action(&input);
        if action.is_none() {
            println!("Invalid input. Enter a single letter or a command.");
        }
        action
    }

    fn show_events(&mut self, session: &GameSession, events: &[GameEvent]) {
        display_events(session, events);
    }

    fn show_message(&mut self, message: &str) {
        println!("{message}");
    }

    fn show_session_complete(&mut self, session: &GameSession) {
        display_session_complete(session);
    }

    fn show_exit_message(&mut self) {
        display_exit_message();
    }
}
