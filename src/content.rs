//! Turning the player's chosen source into a playable puzzle set.

use std::path::PathBuf;

use log::info;
use rand::Rng;

use crate::error::AppError;
use crate::extract::load_source;
use crate::generator::{PuzzleGenerator, generate_puzzles};
use crate::puzzle::{Difficulty, PuzzleSet};
use crate::samples::find_sample;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// A bundled sample, played from its curated puzzles.
    Sample(String),
    /// A document whose text is sent to the generator.
    Document(PathBuf),
}

impl ContentSource {
    pub fn from_args(input: Option<PathBuf>, sample: Option<String>) -> Result<Self, AppError> {
        match (input, sample) {
            (Some(path), _) => Ok(Self::Document(path)),
            (None, Some(key)) => Ok(Self::Sample(key)),
            (None, None) => Err(AppError::NoSource),
        }
    }
}

/// Build the puzzle set for one session. Samples never touch the generator.
pub fn prepare_puzzles<G, R>(
    source: &ContentSource,
    difficulty: Difficulty,
    generator: &G,
    rng: &mut R,
) -> Result<PuzzleSet, AppError>
where
    G: PuzzleGenerator + ?Sized,
    R: Rng + ?Sized,
{
    let wrap = |cause| AppError::Generate {
        difficulty,
        source: cause,
    };
    match source {
        ContentSource::Sample(key) => {
            let sample = find_sample(key)?;
            info!("Using sample '{}' at {difficulty}", sample.title);
            sample.puzzle_set(difficulty).map_err(wrap)
        }
        ContentSource::Document(path) => {
            let text = load_source(path)?;
            info!("Extracted {} characters from {}", text.len(), path.display());
            generate_puzzles(generator, &text, difficulty, rng).map_err(wrap)
        }
    }
}
