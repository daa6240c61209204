//! Generator configuration.
//!
//! Values come from the command line first, then from the environment
//! (which `main` populates from a `.env` file when one exists).

use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const ENDPOINT_VAR: &str = "GEMINI_ENDPOINT";

/// Request header carrying the key, so it never appears in a URL.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key configured; pass --api-key or set GEMINI_API_KEY")]
    MissingApiKey,
}

/// Everything the generator needs to reach the model.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl GeneratorConfig {
    /// Build a config, falling back to environment variables for anything
    /// not given explicitly.
    pub fn resolve(api_key: Option<String>, model: Option<String>) -> Result<Self, ConfigError> {
        let api_key = api_key
            .or_else(|| env::var(API_KEY_VAR).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = model
            .or_else(|| env::var(MODEL_VAR).ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let endpoint = env::var(ENDPOINT_VAR).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        Ok(Self {
            api_key,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// URL of the `generateContent` call. The key travels in
    /// [`API_KEY_HEADER`].
    pub fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}
