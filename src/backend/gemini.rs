//! Gemini backend using rstructor.
//!
//! rstructor takes a single prompt, so the system instruction, the JSON
//! schema and the user payload are folded into one text and the raw answer is
//! parsed as JSON. rstructor has no context-size or nucleus-sampling knob,
//! so only temperature and the output budget reach Gemini.

use super::{parse_json_text, BackendError, ExtractionRequest, StructuredBackend};
use crate::config::Config;
use crate::prompt::Role;
use async_trait::async_trait;
use rstructor::{GeminiClient, GeminiModel, LLMClient};

pub struct GeminiBackend {
    api_key: String,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        Ok(Self::new(config.gemini_key()?))
    }
}

/// Fold the chat messages and the schema into one prompt.
fn build_prompt(request: &ExtractionRequest) -> String {
    let system: Vec<&str> = request
        .messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();
    let user: Vec<&str> = request
        .messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect();
    let schema = serde_json::to_string_pretty(&request.schema).unwrap_or_default();

    format!(
        r#"{}

You MUST respond with valid JSON matching this exact schema:
{}

Do not include any markdown formatting, code blocks, or explanations. Only output the raw JSON object.

---

{}"#,
        system.join("\n\n"),
        schema,
        user.join("\n\n")
    )
}

/// Parse a model string into a GeminiModel. Unknown names are sent as given,
/// so the model requested is always the one stamped on the article.
fn parse_gemini_model(model: &str) -> GeminiModel {
    match model {
        "gemini-2.0-flash" => GeminiModel::Gemini20Flash,
        "gemini-2.5-flash" => GeminiModel::Gemini25Flash,
        "gemini-2.5-pro" => GeminiModel::Gemini25Pro,
        other => GeminiModel::Custom(other.to_string()),
    }
}

#[async_trait]
impl StructuredBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &ExtractionRequest) -> Result<serde_json::Value, BackendError> {
        let max_tokens = u32::try_from(request.max_tokens).unwrap_or(u32::MAX);
        let client = GeminiClient::new(self.api_key.as_str())
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?
            .model(parse_gemini_model(&request.model))
            .temperature(request.temperature)
            .max_tokens(max_tokens);

        let result = client
            .generate_with_metadata(&build_prompt(request))
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        parse_json_text(&result.text)
    }
}
