use serde::{Deserialize, Serialize};

use super::types::TextGenerator;
use super::RagError;
use crate::config;

/// Deterministic decoding: always the highest-probability continuation.
const TEMPERATURE: f32 = 0.0;

/// Completion cap, in tokens.
const MAX_TOKENS: u32 = 256;

/// Generation stops if the model starts a new prompt-style section.
const STOP_MARKER: &str = "###";

/// Generation is slow on CPU hardware; allow several minutes per call.
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Text generator backed by a local Ollama instance.
///
/// One blocking, non-streaming completion per call; the decoding options
/// pin temperature to zero and bound the output so answers stay
/// deterministic and prompt-shaped.
pub struct OllamaGenerator {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl OllamaGenerator {
    pub fn new(base_url: &str, model: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        }
    }

    /// Generator for the configured local instance and model tag.
    pub fn from_config() -> Self {
        Self::new(&config::ollama_url(), &config::generation_model())
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
    stop: [&'static str; 1],
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl TextGenerator for OllamaGenerator {
    fn generate(&self, prompt: &str) -> Result<String, RagError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                num_predict: MAX_TOKENS,
                stop: [STOP_MARKER],
            },
        };

        let resp = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .map_err(|e| RagError::Generation(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().unwrap_or_default();
            return Err(RagError::Generation(format!(
                "Ollama returned {status}: {detail}"
            )));
        }

        let parsed: GenerateResponse = resp
            .json()
            .map_err(|e| RagError::Generation(e.to_string()))?;
        Ok(parsed.response.trim().to_string())
    }
}
