//! Structured-output LLM backends.
//!
//! A backend takes a chat-style message list plus a JSON schema and returns
//! the model's answer as JSON. Validating that JSON against the concrete
//! summary type is left to the extractor.

pub mod gemini;
pub mod ollama;
pub mod openai;

pub use gemini::GeminiBackend;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

use crate::config::{Config, ConfigError, Provider};
use crate::prompt::ChatMessage;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("server returned error status {status}: {body}")]
    ServerError { status: u16, body: String },
    #[error("LLM returned an empty response")]
    EmptyResponse,
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::RequestFailed(err.to_string())
    }
}

/// Backend-specific tuning. Only backends that can apply it per request send it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendOptions {
    /// Working context size
    pub num_ctx: usize,
}

/// Everything a backend needs for one structured-output call.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub options: BackendOptions,
    pub schema_name: String,
    pub schema: serde_json::Value,
}

/// Anything that can produce schema-conformant JSON from a chat message list.
#[async_trait]
pub trait StructuredBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &ExtractionRequest) -> Result<serde_json::Value, BackendError>;
}

#[async_trait]
impl<B: StructuredBackend + ?Sized> StructuredBackend for Arc<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, request: &ExtractionRequest) -> Result<serde_json::Value, BackendError> {
        (**self).generate(request).await
    }
}

/// Build the backend selected in the configuration.
pub fn from_config(config: &Config) -> Result<Arc<dyn StructuredBackend>, BackendError> {
    match config.backend.provider {
        Provider::Ollama => Ok(Arc::new(OllamaBackend::from_config(config)?)),
        Provider::OpenAi => Ok(Arc::new(OpenAiBackend::from_config(config)?)),
        Provider::Gemini => Ok(Arc::new(GeminiBackend::from_config(config)?)),
    }
}

/// Parse model text as JSON, tolerating a markdown code fence around it.
pub(crate) fn parse_json_text(text: &str) -> Result<serde_json::Value, BackendError> {
    let cleaned = strip_markdown_json(text);
    if cleaned.is_empty() {
        return Err(BackendError::EmptyResponse);
    }
    serde_json::from_str(&cleaned).map_err(|e| BackendError::ParseError(format!("{}: {}", e, cleaned)))
}

/// Strip markdown code block wrappers from JSON response
fn strip_markdown_json(text: &str) -> String {
    let trimmed = text.trim();

    // Remove ```json ... ``` or ``` ... ```
    if let Some(without_fence) = trimmed.strip_prefix("```") {
        let without_prefix = without_fence.strip_prefix("json").unwrap_or(without_fence);

        if let Some(end_idx) = without_prefix.rfind("```") {
            return without_prefix[..end_idx].trim().to_string();
        }
    }

    trimmed.to_string()
}
