// Library interface for study-hangman
// This allows integration tests to access internal modules

pub mod cli;
pub mod content;
pub mod error;
pub mod extract;
pub mod game_state;
pub mod generator;
pub mod logging;
pub mod notify;
pub mod puzzle;
pub mod samples;
pub mod session;
pub mod tui;
pub mod validator;

// Re-export commonly used items for easier testing
pub use content::{ContentSource, prepare_puzzles};
pub use error::{AppError, ExtractError, GenerateError, Rejection};
pub use game_state::{GameInterface, SessionEnd, UserAction, game_loop};
pub use generator::{GeminiClient, GeminiConfig, PuzzleGenerator, generate_puzzles};
pub use notify::{BellNotifier, GameEvent, LogNotifier, Notifier, SilentNotifier};
pub use puzzle::{Difficulty, PuzzleRecord, PuzzleSet, RawCandidate};
pub use samples::{Sample, find_sample, load_samples};
pub use session::{Advance, GameConfig, GameSession, PuzzleStatus, SessionStats};
pub use validator::{validate_candidate, validate_candidates};
