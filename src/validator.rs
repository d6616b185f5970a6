//! Filters untrusted puzzle candidates down to the playable set.
//!
//! Each candidate either becomes a [`PuzzleRecord`] or is dropped with a
//! [`Rejection`]; nothing is repaired except whitespace in hard-tier phrases.

use std::ops::RangeInclusive;

use crate::error::{GenerateError, Rejection};
use crate::puzzle::{Difficulty, PuzzleRecord, PuzzleSet, RawCandidate};
use crate::{debug_log, info_log};

pub const EASY_LENGTH: RangeInclusive<usize> = 4..=7;
pub const MEDIUM_LENGTH: RangeInclusive<usize> = 8..=12;
pub const HARD_SINGLE_WORD_MIN: usize = 13;
pub const HARD_PHRASE_WORDS: RangeInclusive<usize> = 2..=4;
pub const HARD_PHRASE_WORD_MIN: usize = 2;

/// Validate every candidate against `difficulty`, keeping input order.
///
/// Returns [`GenerateError::NoValidContent`] when nothing survives.
pub fn validate_candidates(
    candidates: &[RawCandidate],
    difficulty: Difficulty,
) -> Result<PuzzleSet, GenerateError> {
    let mut accepted = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match validate_candidate(candidate, difficulty) {
            Ok(record) => accepted.push(record),
            Err(rejection) => {
                debug_log!("Dropping candidate {:?}: {}", candidate.word, rejection);
            }
        }
    }

    info_log!(
        "Validated {} of {} {} candidates",
        accepted.len(),
        candidates.len(),
        difficulty
    );

    if accepted.is_empty() {
        log::warn!("No {difficulty} candidates survived validation");
        return Err(GenerateError::NoValidContent(difficulty));
    }
    Ok(PuzzleSet::new(difficulty, accepted))
}

pub fn validate_candidate(
    candidate: &RawCandidate,
    difficulty: Difficulty,
) -> Result<PuzzleRecord, Rejection> {
    let word = required(candidate.word.as_deref(), "word")?;
    let question = required(candidate.question.as_deref(), "question")?;
    let hint = required(candidate.hint.as_deref(), "hint")?;
    let level = required(candidate.level.as_deref(), "level")?;

    // Labels must match exactly; "easy" is not "Easy".
    if level != difficulty.label() {
        return Err(Rejection::TierMismatch {
            expected: difficulty,
            found: level.to_string(),
        });
    }

    let answer = match difficulty {
        Difficulty::Easy => check_single_word(word, EASY_LENGTH)?,
        Difficulty::Medium => check_single_word(word, MEDIUM_LENGTH)?,
        Difficulty::Hard => check_hard_answer(word)?,
    };

    Ok(PuzzleRecord::new(
        answer,
        question.trim().to_string(),
        hint.trim().to_string(),
        difficulty,
    ))
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, Rejection> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Rejection::MissingField(field)),
    }
}

fn check_single_word(word: &str, bounds: RangeInclusive<usize>) -> Result<String, Rejection> {
    if !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Rejection::NonAlphabetic(word.to_string()));
    }
    let len = word.len();
    if !bounds.contains(&len) {
        return Err(Rejection::LengthOutOfRange {
            len,
            min: *bounds.start(),
            max: *bounds.end(),
        });
    }
    Ok(word.to_ascii_uppercase())
}

/// Hard answers are one long word or a short phrase of real words.
fn check_hard_answer(word: &str) -> Result<String, Rejection> {
    if !word
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
    {
        return Err(Rejection::NonAlphabetic(word.to_string()));
    }

    let tokens: Vec<&str> = word.split_whitespace().collect();
    match tokens.as_slice() {
        [] => Err(Rejection::MissingField("word")),
        [single] => {
            if single.len() >= HARD_SINGLE_WORD_MIN {
                Ok(single.to_ascii_uppercase())
            } else {
                Err(Rejection::LengthOutOfRange {
                    len: single.len(),
                    min: HARD_SINGLE_WORD_MIN,
                    max: usize::MAX,
                })
            }
        }
        phrase if HARD_PHRASE_WORDS.contains(&phrase.len()) => {
            if let Some(short) = phrase.iter().find(|t| t.len() < HARD_PHRASE_WORD_MIN) {
                return Err(Rejection::ShortToken((*short).to_string()));
            }
            Ok(phrase.join(" ").to_ascii_uppercase())
        }
        phrase => Err(Rejection::TokenCount(phrase.len())),
    }
}
