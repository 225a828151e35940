// src/tools/llm.rs

use crate::config::LlmConfig;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Opaque text-completion backend: prompt in, completion text out.
pub trait Oracle: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("API key not found in environment variable {0}")]
    MissingApiKey(String),

    #[error("Unknown LLM provider: '{0}'. Supported: gemini, ollama")]
    UnknownProvider(String),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Provider {
    Gemini,
    Ollama,
}

/// Sends prompts to a hosted Gemini model or a local Ollama server.
pub struct LLMTool {
    provider: Provider,
    pub model: String,
    api_key: Option<String>,
    base_url: String,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    http: Client,
}

impl LLMTool {
    pub fn from_config(config: &LlmConfig) -> Result<Self, OracleError> {
        debug!(provider = %config.provider, model = %config.model, "from_config: called");
        let provider = match config.provider.as_str() {
            "gemini" => Provider::Gemini,
            "ollama" => Provider::Ollama,
            other => return Err(OracleError::UnknownProvider(other.to_string())),
        };

        let api_key = config.api_key();
        if provider == Provider::Gemini && api_key.is_none() {
            return Err(OracleError::MissingApiKey(config.api_key_env.clone()));
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            provider,
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
            http,
        })
    }

    fn endpoint(&self) -> String {
        match self.provider {
            Provider::Gemini => format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model),
            Provider::Ollama => format!("{}/api/generate", self.base_url),
        }
    }

    fn build_request_body(&self, prompt: &str) -> Value {
        match self.provider {
            Provider::Gemini => json!({
                "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "topP": self.top_p,
                    "topK": self.top_k,
                    "maxOutputTokens": self.max_output_tokens,
                }
            }),
            Provider::Ollama => json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
                "options": {
                    "temperature": self.temperature,
                    "top_p": self.top_p,
                    "top_k": self.top_k,
                    "num_predict": self.max_output_tokens,
                }
            }),
        }
    }

    fn extract_text(&self, body: &Value) -> Result<String, OracleError> {
        match self.provider {
            Provider::Gemini => extract_gemini_text(body),
            Provider::Ollama => body
                .get("response")
                .and_then(|v| v.as_str())
                .map(|text| text.trim().to_string())
                .ok_or_else(|| OracleError::InvalidResponse("LLM response missing 'response' field".into())),
        }
    }
}

impl Oracle for LLMTool {
    fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "complete: called");
        let mut request = self.http.post(self.endpoint()).json(&self.build_request_body(prompt));
        if let Some(key) = &self.api_key {
            request = request.header("x-goog-api-key", key);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            debug!(status = status.as_u16(), "complete: API error");
            return Err(OracleError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json()?;
        self.extract_text(&body)
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_gemini_text(body: &Value) -> Result<String, OracleError> {
    let parts = body
        .pointer("/candidates/0/content/parts")
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            let reason = body
                .pointer("/promptFeedback/blockReason")
                .and_then(|v| v.as_str())
                .unwrap_or("no candidates");
            OracleError::InvalidResponse(format!("Gemini returned no content ({reason})"))
        })?;

    let text: String = parts.iter().filter_map(|p| p.get("text").and_then(|t| t.as_str())).collect();
    if text.trim().is_empty() {
        return Err(OracleError::InvalidResponse("Gemini returned empty text".into()));
    }
    Ok(text)
}
