//! Question generation through the Generative Language API.
//!
//! One request per batch: resolve the source, build a prompt, POST it, pull
//! the JSON array out of the reply and validate it.

mod client;
mod parse;
mod prompt;

use thiserror::Error;

use crate::models::Difficulty;
use crate::source::{SourceError, SourceSpec};

pub use client::{parse_generation_response, request_body, QuizGenerator};
pub use parse::{extract_json_array, validate_questions, ShapeError};
pub use prompt::build_prompt;

/// Smallest and largest batch a user may ask for.
pub const MIN_QUESTIONS: usize = 1;
pub const MAX_QUESTIONS: usize = 20;
pub const DEFAULT_QUESTIONS: usize = 5;

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub source: SourceSpec,
    pub count: usize,
    pub difficulty: Difficulty,
}

impl GenerationRequest {
    pub fn new(source: SourceSpec, count: usize, difficulty: Difficulty) -> Self {
        Self {
            source,
            count: count.clamp(MIN_QUESTIONS, MAX_QUESTIONS),
            difficulty,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("request to the model failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limit reached, wait a moment and try again")]
    RateLimited,

    #[error("the model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response from the model: {0}")]
    MalformedResponse(String),

    #[error("the model reply did not contain a question list")]
    NoQuestions,

    #[error("the question list is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid question list: {0}")]
    Shape(#[from] ShapeError),
}
