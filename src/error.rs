use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::extract::MIN_TEXT_LENGTH;
use crate::puzzle::Difficulty;

/// Failures turning an uploaded document into plain text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("please select a PDF or plain-text file ('{0}' is not supported)")]
    UnsupportedFormat(String),
    #[error("failed to extract text from PDF, please ensure it contains readable text: {0}")]
    Unreadable(#[from] lopdf::Error),
    #[error("PDF appears to be empty")]
    EmptyDocument,
    #[error(
        "document contains insufficient text content for quiz generation \
         ({found} characters, need at least {MIN_TEXT_LENGTH})"
    )]
    InsufficientText { found: usize },
}

/// Failures producing puzzles from source text.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("a Gemini API key is required, set GEMINI_API_KEY or pass --api-key")]
    MissingApiKey,
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation service error: {code} - {reason}")]
    Status { code: u16, reason: String },
    #[error("no content generated by the service")]
    EmptyResponse,
    #[error("no valid JSON array found in the service response")]
    NoJsonArray,
    #[error("invalid response format: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("the service returned an empty puzzle list")]
    EmptyArray,
    #[error(
        "no valid {0} level words could be generated from the provided text, \
         try a different document or check that it contains suitable {0} level content"
    )]
    NoValidContent(Difficulty),
}

/// Why the validator dropped a single candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("missing or empty field '{0}'")]
    MissingField(&'static str),
    #[error("candidate is tagged '{found}', expected {expected}")]
    TierMismatch { expected: Difficulty, found: String },
    #[error("answer '{0}' contains characters that are not allowed")]
    NonAlphabetic(String),
    #[error("answer length {len} is outside {min}..={max}")]
    LengthOutOfRange { len: usize, min: usize, max: usize },
    #[error("phrase has {0} words, expected 1 to 4")]
    TokenCount(usize),
    #[error("phrase word '{0}' is shorter than 2 letters")]
    ShortToken(String),
}

/// Everything that can stop the application before or outside of play.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("failed to generate {difficulty} level questions: {source}")]
    Generate {
        difficulty: Difficulty,
        #[source]
        source: GenerateError,
    },
    #[error("unknown sample '{0}', run with --list-samples to see what is available")]
    UnknownSample(String),
    #[error("no content selected, pass --input <FILE> or --sample <NAME>")]
    NoSource,
    #[error("bundled sample data is corrupt: {0}")]
    SampleData(#[from] serde_json::Error),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}
