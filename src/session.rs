//! The guessing game state machine.
//!
//! A [`GameSession`] walks a [`PuzzleSet`] one puzzle at a time. Each puzzle
//! starts `Playing` and ends `Won` or `Lost`; only an explicit advance or
//! restart leaves a finished puzzle. Every operation returns the
//! [`GameEvent`]s it caused, and an empty list means the call was a no-op.

use std::collections::BTreeSet;

use crate::notify::GameEvent;
use crate::puzzle::{PuzzleRecord, PuzzleSet};
use crate::{debug_log, info_log};

pub const DEFAULT_MAX_WRONG_GUESSES: u32 = 10;
pub const DEFAULT_POINTS_PER_LETTER: u32 = 10;
pub const DEFAULT_HINT_AFTER: u32 = 3;

/// Tuning knobs for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub max_wrong_guesses: u32,
    pub points_per_letter: u32,
    /// Wrong guesses after which the hint is revealed automatically.
    pub hint_after: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_wrong_guesses: DEFAULT_MAX_WRONG_GUESSES,
            points_per_letter: DEFAULT_POINTS_PER_LETTER,
            hint_after: DEFAULT_HINT_AFTER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleStatus {
    Playing,
    Won,
    Lost,
}

impl PuzzleStatus {
    #[must_use]
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Totals across the whole session; untouched by advancing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub words_completed: usize,
    pub total_words: usize,
    pub correct_guesses: u32,
    pub wrong_guesses: u32,
    pub hints_used: u32,
}

impl SessionStats {
    /// Percentage of correct guesses, rounded; 0 before any guess.
    #[must_use]
    pub fn accuracy(&self) -> u32 {
        let total = self.correct_guesses + self.wrong_guesses;
        if total == 0 {
            return 0;
        }
        (f64::from(self.correct_guesses) * 100.0 / f64::from(total)).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the puzzle at this index.
    NextPuzzle(usize),
    /// The last puzzle was finished; nothing further to play.
    SessionComplete,
    /// The current puzzle is still being played.
    NotFinished,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    puzzles: PuzzleSet,
    config: GameConfig,
    current_index: usize,
    guessed_letters: BTreeSet<char>,
    wrong_guess_count: u32,
    status: PuzzleStatus,
    hint_revealed: bool,
    score: u32,
    stats: SessionStats,
    complete: bool,
}

impl GameSession {
    pub fn new(puzzles: PuzzleSet, config: GameConfig) -> Self {
        let total_words = puzzles.len();
        let complete = puzzles.is_empty();
        info_log!(
            "GameSession::new() - {} {} puzzles",
            total_words,
            puzzles.difficulty()
        );
        Self {
            puzzles,
            config,
            current_index: 0,
            guessed_letters: BTreeSet::new(),
            wrong_guess_count: 0,
            status: PuzzleStatus::Playing,
            hint_revealed: false,
            score: 0,
            stats: SessionStats {
                total_words,
                ..SessionStats::default()
            },
            complete,
        }
    }

    /// Guess one letter of the current puzzle.
    ///
    /// Non-letters, repeats, and guesses outside active play are ignored.
    pub fn guess_letter(&mut self, letter: char) -> Vec<GameEvent> {
        if !letter.is_ascii_alphabetic() || !self.is_playing() {
            return Vec::new();
        }
        let letter = letter.to_ascii_uppercase();
        if !self.guessed_letters.insert(letter) {
            debug_log!("guess_letter() - '{}' already guessed", letter);
            return Vec::new();
        }

        let Some(puzzle) = self.puzzles.get(self.current_index) else {
            return Vec::new();
        };
        let mut events = Vec::new();

        if puzzle.contains_letter(letter) {
            self.stats.correct_guesses += 1;
            self.score += self.config.points_per_letter;
            events.push(GameEvent::CorrectGuess(letter));

            let solved = puzzle
                .guessable_letters()
                .all(|c| self.guessed_letters.contains(&c));
            if solved {
                self.status = PuzzleStatus::Won;
                self.stats.words_completed += 1;
                events.push(GameEvent::PuzzleWon);
                info_log!("Puzzle {} won", self.current_index + 1);
            }
        } else {
            self.wrong_guess_count += 1;
            self.stats.wrong_guesses += 1;
            events.push(GameEvent::WrongGuess(letter));

            if self.wrong_guess_count >= self.config.hint_after && self.reveal() {
                events.push(GameEvent::HintRevealed);
            }
            if self.wrong_guess_count >= self.config.max_wrong_guesses {
                self.status = PuzzleStatus::Lost;
                events.push(GameEvent::PuzzleLost);
                info_log!("Puzzle {} lost", self.current_index + 1);
            }
        }
        events
    }

    /// Show the hint for the current puzzle. Counted once per puzzle.
    pub fn reveal_hint(&mut self) -> Vec<GameEvent> {
        if self.complete || !self.reveal() {
            return Vec::new();
        }
        vec![GameEvent::HintRevealed]
    }

    fn reveal(&mut self) -> bool {
        if self.hint_revealed {
            return false;
        }
        self.hint_revealed = true;
        self.stats.hints_used += 1;
        true
    }

    /// Move past a finished puzzle.
    pub fn advance_puzzle(&mut self) -> Advance {
        if self.complete {
            return Advance::SessionComplete;
        }
        if !self.status.is_finished() {
            return Advance::NotFinished;
        }
        if self.current_index + 1 >= self.puzzles.len() {
            self.complete = true;
            info_log!("Session complete with score {}", self.score);
            return Advance::SessionComplete;
        }
        self.current_index += 1;
        self.reset_puzzle_state();
        Advance::NextPuzzle(self.current_index)
    }

    /// Start the same puzzle set over from the beginning.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        self.current_index = 0;
        self.reset_puzzle_state();
        self.score = 0;
        self.stats = SessionStats {
            total_words: self.puzzles.len(),
            ..SessionStats::default()
        };
        self.complete = self.puzzles.is_empty();
        info_log!("Session restarted");
        vec![GameEvent::SessionRestarted]
    }

    fn reset_puzzle_state(&mut self) {
        self.guessed_letters.clear();
        self.wrong_guess_count = 0;
        self.status = PuzzleStatus::Playing;
        self.hint_revealed = false;
    }

    fn is_playing(&self) -> bool {
        !self.complete && self.status == PuzzleStatus::Playing
    }

    #[must_use]
    pub fn current_puzzle(&self) -> Option<&PuzzleRecord> {
        if self.complete {
            return None;
        }
        self.puzzles.get(self.current_index)
    }

    #[must_use]
    pub fn puzzles(&self) -> &PuzzleSet {
        &self.puzzles
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn guessed_letters(&self) -> &BTreeSet<char> {
        &self.guessed_letters
    }

    #[must_use]
    pub fn wrong_guess_count(&self) -> u32 {
        self.wrong_guess_count
    }

    #[must_use]
    pub fn status(&self) -> PuzzleStatus {
        self.status
    }

    #[must_use]
    pub fn hint_revealed(&self) -> bool {
        self.hint_revealed
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    #[must_use]
    pub fn is_last_puzzle(&self) -> bool {
        self.current_index + 1 >= self.puzzles.len()
    }

    #[must_use]
    pub fn words_remaining(&self) -> usize {
        self.puzzles.len().saturating_sub(self.current_index + 1)
    }

    /// The answer with unguessed letters as `_`. Spaces are shown as-is, and
    /// a lost puzzle shows the full answer.
    #[must_use]
    pub fn masked_answer(&self) -> String {
        let Some(puzzle) = self.current_puzzle() else {
            return String::new();
        };
        puzzle
            .answer()
            .chars()
            .map(|c| {
                if c == ' '
                    || self.status == PuzzleStatus::Lost
                    || self.guessed_letters.contains(&c)
                {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{Difficulty, RawCandidate};
    use crate::validator::validate_candidates;
    use pretty_assertions::assert_eq;

    fn session_of(answers: &[&str], difficulty: Difficulty) -> GameSession {
        let raw: Vec<RawCandidate> = answers
            .iter()
            .map(|a| RawCandidate::new(a, "Question?", "Hint", difficulty.label()))
            .collect();
        let set = validate_candidates(&raw, difficulty).unwrap();
        GameSession::new(set, GameConfig::default())
    }

    fn guess_all(session: &mut GameSession, letters: &str) -> Vec<GameEvent> {
        letters.chars().flat_map(|c| session.guess_letter(c)).collect()
    }

    #[test]
    fn test_atom_scenario() {
        let mut session = session_of(&["ATOM"], Difficulty::Easy);
        assert_eq!(session.guess_letter('A'), vec![GameEvent::CorrectGuess('A')]);
        assert_eq!(session.status(), PuzzleStatus::Playing);
        assert_eq!(session.guessed_letters().iter().copied().collect::<Vec<_>>(), vec!['A']);

        let events = guess_all(&mut session, "TOM");
        assert_eq!(events.last(), Some(&GameEvent::PuzzleWon));
        assert_eq!(session.status(), PuzzleStatus::Won);
        assert_eq!(session.score(), 40);
        assert_eq!(session.stats().words_completed, 1);
        assert_eq!(session.stats().correct_guesses, 4);
    }

    #[test]
    fn test_cell_lost_exactly_on_tenth_wrong_guess() {
        let mut session = session_of(&["CELL"], Difficulty::Easy);
        for (i, letter) in "XQZWBDFGHJ".chars().enumerate() {
            let events = session.guess_letter(letter);
            if i < 9 {
                assert_eq!(session.status(), PuzzleStatus::Playing, "after guess {}", i + 1);
                assert!(!events.contains(&GameEvent::PuzzleLost));
            } else {
                assert_eq!(session.status(), PuzzleStatus::Lost);
                assert_eq!(events.last(), Some(&GameEvent::PuzzleLost));
            }
        }
        assert_eq!(session.wrong_guess_count(), 10);
        assert_eq!(session.stats().wrong_guesses, 10);
        assert_eq!(session.score(), 0);
        assert!(session.guess_letter('K').is_empty());
        assert_eq!(session.wrong_guess_count(), 10);
    }

    #[test]
    fn test_repeat_guess_is_a_no_op() {
        let mut session = session_of(&["CELL"], Difficulty::Easy);
        session.guess_letter('X');
        let before = (
            session.guessed_letters().clone(),
            session.wrong_guess_count(),
            session.score(),
            *session.stats(),
        );
        assert!(session.guess_letter('X').is_empty());
        assert!(session.guess_letter('x').is_empty());
        let after = (
            session.guessed_letters().clone(),
            session.wrong_guess_count(),
            session.score(),
            *session.stats(),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_non_letters_ignored() {
        let mut session = session_of(&["CELL"], Difficulty::Easy);
        assert!(session.guess_letter(' ').is_empty());
        assert!(session.guess_letter('7').is_empty());
        assert!(session.guess_letter('é').is_empty());
        assert!(session.guessed_letters().is_empty());
    }

    #[test]
    fn test_lowercase_guess_counts_as_uppercase() {
        let mut session = session_of(&["CELL"], Difficulty::Easy);
        assert_eq!(session.guess_letter('c'), vec![GameEvent::CorrectGuess('C')]);
        assert!(session.guessed_letters().contains(&'C'));
    }

    #[test]
    fn test_hint_revealed_on_third_wrong_guess() {
        let mut session = session_of(&["CELL"], Difficulty::Easy);
        guess_all(&mut session, "XQ");
        assert!(!session.hint_revealed());
        let events = session.guess_letter('Z');
        assert_eq!(events, vec![GameEvent::WrongGuess('Z'), GameEvent::HintRevealed]);
        assert!(session.hint_revealed());
        assert_eq!(session.stats().hints_used, 1);

        // Further wrong guesses never count the hint again.
        guess_all(&mut session, "WB");
        assert!(session.hint_revealed());
        assert_eq!(session.stats().hints_used, 1);
    }

    #[test]
    fn test_manual_hint_counts_once() {
        let mut session = session_of(&["CELL"], Difficulty::Easy);
        assert_eq!(session.reveal_hint(), vec![GameEvent::HintRevealed]);
        assert!(session.reveal_hint().is_empty());
        guess_all(&mut session, "XQZ");
        assert_eq!(session.stats().hints_used, 1);
    }

    #[test]
    fn test_hint_allowed_after_puzzle_finished() {
        let mut session = session_of(&["ATOM"], Difficulty::Easy);
        guess_all(&mut session, "ATOM");
        assert_eq!(session.reveal_hint(), vec![GameEvent::HintRevealed]);
    }

    #[test]
    fn test_phrase_spaces_are_pre_revealed() {
        let mut session = session_of(&["NATURAL SELECTION"], Difficulty::Hard);
        assert_eq!(session.masked_answer(), "_______ _________");
        assert!(session.guess_letter(' ').is_empty());

        guess_all(&mut session, "NATURLSECI");
        assert_eq!(session.status(), PuzzleStatus::Playing);
        assert_eq!(session.masked_answer(), "NATURAL SELECTI_N");

        session.guess_letter('O');
        assert_eq!(session.status(), PuzzleStatus::Won);
        assert_eq!(session.score(), 110);
        assert_eq!(session.stats().wrong_guesses, 0);
    }

    #[test]
    fn test_lost_puzzle_reveals_answer() {
        let mut session = session_of(&["CELL"], Difficulty::Easy);
        session.guess_letter('C');
        assert_eq!(session.masked_answer(), "C___");
        guess_all(&mut session, "XQZWBDFGHJ");
        assert_eq!(session.masked_answer(), "CELL");
    }

    #[test]
    fn test_advance_requires_finished_puzzle() {
        let mut session = session_of(&["ATOM", "CELL"], Difficulty::Easy);
        assert_eq!(session.advance_puzzle(), Advance::NotFinished);
        assert_eq!(session.current_index(), 0);

        guess_all(&mut session, "ATOMX");
        assert_eq!(session.reveal_hint().len(), 1);
        assert_eq!(session.advance_puzzle(), Advance::NextPuzzle(1));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.status(), PuzzleStatus::Playing);
        assert!(session.guessed_letters().is_empty());
        assert_eq!(session.wrong_guess_count(), 0);
        assert!(!session.hint_revealed());

        // Aggregates and score survive the advance.
        assert_eq!(session.score(), 40);
        assert_eq!(session.stats().words_completed, 1);
        assert_eq!(session.stats().hints_used, 1);
    }

    #[test]
    fn test_advance_past_last_puzzle_completes_session() {
        let mut session = session_of(&["ATOM"], Difficulty::Easy);
        guess_all(&mut session, "ATOM");
        assert!(session.is_last_puzzle());
        assert_eq!(session.advance_puzzle(), Advance::SessionComplete);
        assert!(session.is_complete());
        assert!(session.current_puzzle().is_none());
        assert_eq!(session.current_index(), 0);
        assert!(session.guess_letter('Q').is_empty());
        assert!(session.reveal_hint().is_empty());
        assert_eq!(session.advance_puzzle(), Advance::SessionComplete);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = session_of(&["ATOM", "CELL"], Difficulty::Easy);
        guess_all(&mut session, "ATOM");
        session.advance_puzzle();
        guess_all(&mut session, "XQZ");

        assert_eq!(session.restart(), vec![GameEvent::SessionRestarted]);
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_index(), 0);
        assert_eq!(
            *session.stats(),
            SessionStats {
                total_words: 2,
                ..SessionStats::default()
            }
        );
        assert_eq!(session.status(), PuzzleStatus::Playing);
        assert!(!session.hint_revealed());
        assert!(!session.is_complete());
    }

    #[test]
    fn test_restart_after_completion() {
        let mut session = session_of(&["ATOM"], Difficulty::Easy);
        guess_all(&mut session, "ATOM");
        session.advance_puzzle();
        session.restart();
        assert_eq!(session.current_puzzle().map(PuzzleRecord::answer), Some("ATOM"));
        assert_eq!(session.guess_letter('A').len(), 1);
    }

    #[test]
    fn test_empty_set_is_already_complete() {
        let session = GameSession::new(
            PuzzleSet::new(Difficulty::Easy, Vec::new()),
            GameConfig::default(),
        );
        let mut session = session;
        assert!(session.is_complete());
        assert!(session.current_puzzle().is_none());
        assert!(session.guess_letter('A').is_empty());
        assert_eq!(session.advance_puzzle(), Advance::SessionComplete);
        session.restart();
        assert!(session.is_complete());
        assert_eq!(session.masked_answer(), "");
    }

    #[test]
    fn test_custom_config() {
        let raw = vec![RawCandidate::new("CELL", "q", "h", "Easy")];
        let set = validate_candidates(&raw, Difficulty::Easy).unwrap();
        let config = GameConfig {
            max_wrong_guesses: 2,
            points_per_letter: 5,
            hint_after: 1,
        };
        let mut session = GameSession::new(set, config);
        assert_eq!(session.guess_letter('C'), vec![GameEvent::CorrectGuess('C')]);
        assert_eq!(session.score(), 5);
        assert_eq!(
            session.guess_letter('X'),
            vec![GameEvent::WrongGuess('X'), GameEvent::HintRevealed]
        );
        assert_eq!(
            session.guess_letter('Q'),
            vec![GameEvent::WrongGuess('Q'), GameEvent::PuzzleLost]
        );
    }

    #[test]
    fn test_accuracy() {
        let mut stats = SessionStats::default();
        assert_eq!(stats.accuracy(), 0);
        stats.correct_guesses = 2;
        stats.wrong_guesses = 1;
        assert_eq!(stats.accuracy(), 67);
        stats.wrong_guesses = 0;
        assert_eq!(stats.accuracy(), 100);
    }

    #[test]
    fn test_words_remaining() {
        let mut session = session_of(&["ATOM", "CELL", "FORCE"], Difficulty::Easy);
        assert_eq!(session.words_remaining(), 2);
        guess_all(&mut session, "ATOM");
        session.advance_puzzle();
        assert_eq!(session.words_remaining(), 1);
    }
}
