//! Puzzle generation through the Gemini `generateContent` endpoint.

use rand::Rng;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use log::{error, info, warn};

use crate::debug_log;
use crate::error::GenerateError;
use crate::puzzle::{Difficulty, PuzzleSet, RawCandidate};
use crate::validator::validate_candidates;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
/// How many puzzles the service is asked for.
pub const TARGET_COUNT: usize = 15;
/// Source text beyond this many characters is not sent.
pub const MAX_SOURCE_CHARS: usize = 4000;

/// Anything that turns source text into raw puzzle candidates.
pub trait PuzzleGenerator {
    fn generate(&self, text: &str, difficulty: Difficulty) -> Result<Vec<RawCandidate>, GenerateError>;
}

/// Generate, validate, then shuffle one puzzle set.
pub fn generate_puzzles<G, R>(
    generator: &G,
    text: &str,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<PuzzleSet, GenerateError>
where
    G: PuzzleGenerator + ?Sized,
    R: Rng + ?Sized,
{
    let candidates = generator.generate(text, difficulty)?;
    if candidates.is_empty() {
        return Err(GenerateError::EmptyArray);
    }
    let mut set = validate_candidates(&candidates, difficulty)?;
    set.shuffle(rng);
    Ok(set)
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl GeminiConfig {
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    http: Client,
    seed: u32,
}

impl GeminiClient {
    /// `seed` varies the prompt between runs so repeated uploads get different questions.
    pub fn new(config: GeminiConfig, seed: u32) -> Self {
        Self {
            config,
            http: Client::new(),
            seed,
        }
    }

    fn api_key(&self) -> Result<&str, GenerateError> {
        match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(GenerateError::MissingApiKey),
        }
    }
}

impl PuzzleGenerator for GeminiClient {
    fn generate(&self, text: &str, difficulty: Difficulty) -> Result<Vec<RawCandidate>, GenerateError> {
        let api_key = self.api_key()?;
        let request = GenerateRequest::new(build_prompt(text, difficulty, self.seed));

        info!("Requesting {difficulty} puzzles from {}", self.config.model);
        let response = self
            .http
            .post(self.config.url())
            .query(&[("key", api_key)])
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown error").to_string();
            error!("Generation service returned {status}");
            return Err(GenerateError::Status {
                code: status.as_u16(),
                reason,
            });
        }

        let body: GenerateResponse = response.json()?;
        let generated = body.first_text().ok_or(GenerateError::EmptyResponse)?;
        debug_log!("Generated text: {}", generated);
        parse_candidates(generated)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    fn new(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: GenerationConfig::default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_k: 50,
            top_p: 0.9,
            max_output_tokens: 4000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Decode the JSON array embedded in the model's reply.
///
/// Elements are decoded one by one; an element that is not an object of
/// strings becomes an empty candidate for the validator to reject.
pub fn parse_candidates(generated: &str) -> Result<Vec<RawCandidate>, GenerateError> {
    let array = extract_json_array(generated).ok_or(GenerateError::NoJsonArray)?;
    let values: Vec<Value> = serde_json::from_str(array)?;
    if values.is_empty() {
        return Err(GenerateError::EmptyArray);
    }

    let candidates = values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Discarding malformed candidate: {e}");
                RawCandidate::default()
            })
        })
        .collect::<Vec<RawCandidate>>();
    info!("Service returned {} candidates", candidates.len());
    Ok(candidates)
}

/// The span from the first `[` to the last `]`, which tolerates code fences and chatter.
#[must_use]
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

struct TierGuide {
    length: &'static str,
    complexity: &'static str,
    examples: &'static str,
    format: &'static str,
}

fn tier_guide(difficulty: Difficulty) -> TierGuide {
    match difficulty {
        Difficulty::Easy => TierGuide {
            length: "4-7 letters",
            complexity: "basic concepts, common academic terms, fundamental principles",
            examples: "atom, cell, force, light, sound, plant, water",
            format: "single words only (no spaces, hyphens or apostrophes)",
        },
        Difficulty::Medium => TierGuide {
            length: "8-12 letters",
            complexity: "intermediate concepts, technical terms, processes and systems",
            examples: "molecule, organism, velocity, reaction, equation, function",
            format: "single words only (no spaces, hyphens or apostrophes)",
        },
        Difficulty::Hard => TierGuide {
            length: "13+ letters OR multi-word phrases (2-4 words)",
            complexity: "advanced concepts, specialized terminology, complex processes",
            examples: "photosynthesis, electromagnetic, thermodynamics, natural selection, quantum mechanics",
            format: "one long word (13+ letters) OR a phrase of 2-4 words separated by single spaces",
        },
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build the instruction sent to the model.
#[must_use]
pub fn build_prompt(text: &str, difficulty: Difficulty, seed: u32) -> String {
    let guide = tier_guide(difficulty);
    let characters = match difficulty {
        Difficulty::Hard => {
            "Use only letters and single spaces between words: no hyphens, apostrophes, digits or punctuation. \
             Write phrases with spaces, e.g. \"cellular respiration\" not \"cellularrespiration\"."
        }
        Difficulty::Easy | Difficulty::Medium => "Use only the letters a-z. No proper nouns or brand names.",
    };
    let source = truncate_chars(text, MAX_SOURCE_CHARS);

    format!(
        "You design {difficulty} level Hangman puzzles from study material.\n\
         Variation seed: {seed}. Use it to vary which terms you pick and how you phrase questions.\n\n\
         Pick exactly {TARGET_COUNT} distinct, educationally useful terms from the text below.\n\
         - Length: {length}\n\
         - Complexity: {complexity}\n\
         - Examples of the right level: {examples}\n\
         - Format: {format}\n\
         - {characters}\n\n\
         For each term write a question that clearly points to it (mix definitions, functions, \
         examples and relationships) and a hint that adds new information without repeating the question.\n\n\
         Reply with a JSON array only, no other text. Each element must look like:\n\
         {{\"word\": \"...\", \"question\": \"...\", \"hint\": \"...\", \"level\": \"{difficulty}\"}}\n\n\
         Text:\n{source}",
        length = guide.length,
        complexity = guide.complexity,
        examples = guide.examples,
        format = guide.format,
    )
}
