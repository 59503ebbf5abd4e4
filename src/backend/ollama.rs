//! Ollama native chat backend.
//!
//! Posts to `/api/chat` with the JSON schema as `format`. Sampling, output
//! budget and context size travel in `options`, which Ollama applies per
//! request.

use super::{parse_json_text, BackendError, ExtractionRequest, StructuredBackend};
use crate::config::Config;
use crate::prompt::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("synopsis/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    format: &'a serde_json::Value,
    options: ModelOptions,
}

#[derive(Serialize)]
struct ModelOptions {
    num_ctx: usize,
    num_predict: usize,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: String,
}

#[derive(Debug)]
pub struct OllamaBackend {
    http: Client,
    base_url: String,
}

impl OllamaBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        Self::new(
            config.backend.base_url(),
            Duration::from_secs(config.backend.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

fn build_body(request: &ExtractionRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: &request.model,
        messages: &request.messages,
        stream: false,
        format: &request.schema,
        options: ModelOptions {
            num_ctx: request.options.num_ctx,
            num_predict: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
        },
    }
}

#[async_trait]
impl StructuredBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: &ExtractionRequest) -> Result<serde_json::Value, BackendError> {
        let response = self
            .http
            .post(self.endpoint())
            .json(&build_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BackendError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .message
            .map(|m| m.content)
            .ok_or(BackendError::EmptyResponse)?;

        parse_json_text(&content)
    }
}
