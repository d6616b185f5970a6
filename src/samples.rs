//! Bundled sample content that can be played without a document or API key.

use serde::Deserialize;

use crate::error::{AppError, GenerateError};
use crate::puzzle::{Difficulty, PuzzleSet, RawCandidate};
use crate::validator::validate_candidates;

pub const EMBEDDED_SAMPLES: &str = include_str!("resources/samples.json");

#[derive(Debug, Clone, Deserialize)]
struct SamplePuzzles {
    easy: Vec<RawCandidate>,
    medium: Vec<RawCandidate>,
    hard: Vec<RawCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sample {
    pub key: String,
    pub title: String,
    pub description: String,
    pub text: String,
    puzzles: SamplePuzzles,
}

impl Sample {
    #[must_use]
    pub fn candidates(&self, difficulty: Difficulty) -> &[RawCandidate] {
        match difficulty {
            Difficulty::Easy => &self.puzzles.easy,
            Difficulty::Medium => &self.puzzles.medium,
            Difficulty::Hard => &self.puzzles.hard,
        }
    }

    /// The curated puzzles for `difficulty`, held to the same rules as generated ones.
    pub fn puzzle_set(&self, difficulty: Difficulty) -> Result<PuzzleSet, GenerateError> {
        validate_candidates(self.candidates(difficulty), difficulty)
    }

    /// Playable puzzle count for `difficulty`.
    #[must_use]
    pub fn playable_count(&self, difficulty: Difficulty) -> usize {
        self.puzzle_set(difficulty).map_or(0, |set| set.len())
    }

    /// The start of the study text on one line, cut at `max_chars`.
    #[must_use]
    pub fn excerpt(&self, max_chars: usize) -> String {
        let flat = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= max_chars {
            return flat;
        }
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

pub fn load_samples_from_str(data: &str) -> Result<Vec<Sample>, serde_json::Error> {
    serde_json::from_str(data)
}

pub fn load_samples() -> Result<Vec<Sample>, serde_json::Error> {
    load_samples_from_str(EMBEDDED_SAMPLES)
}

pub fn find_sample(key: &str) -> Result<Sample, AppError> {
    load_samples()?
        .into_iter()
        .find(|s| s.key.eq_ignore_ascii_case(key.trim()))
        .ok_or_else(|| AppError::UnknownSample(key.to_string()))
}
