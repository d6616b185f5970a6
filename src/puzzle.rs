//! Puzzle data model.
//!
//! `RawCandidate` is what arrives from outside the program (the generation
//! service or the bundled samples). `PuzzleRecord` is the validated, immutable
//! form produced by [`crate::validator`], and `PuzzleSet` is the ordered
//! collection one game session plays through.

use clap::ValueEnum;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An untrusted puzzle candidate, field names as the generation service emits them.
///
/// Every field is optional so that one malformed element never poisons a batch;
/// the validator decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandidate {
    #[serde(default, alias = "answer")]
    pub word: Option<String>,
    #[serde(default, alias = "prompt")]
    pub question: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default, alias = "difficultyTier")]
    pub level: Option<String>,
}

impl RawCandidate {
    pub fn new(word: &str, question: &str, hint: &str, level: &str) -> Self {
        Self {
            word: Some(word.to_string()),
            question: Some(question.to_string()),
            hint: Some(hint.to_string()),
            level: Some(level.to_string()),
        }
    }
}

/// One validated question/answer/hint triple.
///
/// Only the validator constructs these, which keeps the answer consistent with
/// the structural rule for its tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleRecord {
    answer: String,
    prompt: String,
    hint: String,
    difficulty: Difficulty,
}

impl PuzzleRecord {
    pub(crate) fn new(answer: String, prompt: String, hint: String, difficulty: Difficulty) -> Self {
        Self {
            answer,
            prompt,
            hint,
            difficulty,
        }
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Answer letters a player has to find. Spaces are never guessable.
    pub fn guessable_letters(&self) -> impl Iterator<Item = char> + '_ {
        self.answer.chars().filter(|c| *c != ' ')
    }

    #[must_use]
    pub fn contains_letter(&self, letter: char) -> bool {
        self.guessable_letters().any(|c| c == letter)
    }

    #[must_use]
    pub fn is_phrase(&self) -> bool {
        self.answer.contains(' ')
    }
}

/// Ordered puzzles sharing one difficulty, consumed by exactly one session.
///
/// Duplicate answers are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleSet {
    difficulty: Difficulty,
    puzzles: Vec<PuzzleRecord>,
}

impl PuzzleSet {
    pub(crate) fn new(difficulty: Difficulty, puzzles: Vec<PuzzleRecord>) -> Self {
        Self {
            difficulty,
            puzzles,
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PuzzleRecord> {
        self.puzzles.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PuzzleRecord> {
        self.puzzles.iter()
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.puzzles.shuffle(rng);
    }
}

impl<'a> IntoIterator for &'a PuzzleSet {
    type Item = &'a PuzzleRecord;
    type IntoIter = std::slice::Iter<'a, PuzzleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.puzzles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_candidate_accepts_both_field_spellings() {
        let wire: RawCandidate =
            serde_json::from_str(r#"{"word":"ATOM","question":"q","hint":"h","level":"Easy"}"#)
                .unwrap();
        let alias: RawCandidate = serde_json::from_str(
            r#"{"answer":"ATOM","prompt":"q","hint":"h","difficultyTier":"Easy"}"#,
        )
        .unwrap();
        assert_eq!(wire, alias);
    }

    #[test]
    fn test_raw_candidate_missing_fields_are_none() {
        let raw: RawCandidate = serde_json::from_str(r#"{"word":"ATOM"}"#).unwrap();
        assert_eq!(raw.word.as_deref(), Some("ATOM"));
        assert!(raw.question.is_none());
        assert!(raw.hint.is_none());
        assert!(raw.level.is_none());
    }

    #[test]
    fn test_guessable_letters_skip_spaces() {
        let record = PuzzleRecord::new(
            "NATURAL SELECTION".to_string(),
            "q".to_string(),
            "h".to_string(),
            Difficulty::Hard,
        );
        assert!(record.is_phrase());
        assert!(!record.contains_letter(' '));
        assert!(record.contains_letter('N'));
        assert_eq!(record.guessable_letters().count(), 16);
    }
}
