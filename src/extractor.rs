//! Structured extraction: one backend call per article, never an error.

use crate::backend::{BackendOptions, ExtractionRequest, StructuredBackend};
use crate::config::PipelineConfig;
use crate::prompt::Prompt;
use crate::summary::{schema_value, SummarySchema};
use std::marker::PhantomData;

/// Low temperature keeps the synopsis close to the source text.
pub const TEMPERATURE: f32 = 0.2;

/// Nucleus sampling probability.
pub const TOP_P: f32 = 0.9;

/// Requests a `S`-shaped answer from a backend.
///
/// Failures of any kind (transport, status, malformed JSON, schema mismatch)
/// are logged and reported as `None`. There is exactly one attempt.
pub struct Extractor<S, B> {
    backend: B,
    schema: serde_json::Value,
    _schema: PhantomData<fn() -> S>,
}

impl<S: SummarySchema, B: StructuredBackend> Extractor<S, B> {
    /// Extractor using the JSON schema derived from `S`.
    pub fn new(backend: B) -> Self {
        Self::with_schema(backend, schema_value::<S>())
    }

    /// Extractor sending a hand-written schema that is equivalent to `S`.
    pub fn with_schema(backend: B, schema: serde_json::Value) -> Self {
        Self {
            backend,
            schema,
            _schema: PhantomData,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn request(&self, prompt: &Prompt, config: &PipelineConfig) -> ExtractionRequest {
        ExtractionRequest {
            model: config.model.clone(),
            messages: prompt.messages(),
            max_tokens: config.max_summary_length,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            options: BackendOptions {
                num_ctx: config.context_window_size,
            },
            schema_name: S::NAME.to_string(),
            schema: self.schema.clone(),
        }
    }

    pub async fn extract(&self, prompt: &Prompt, config: &PipelineConfig) -> Option<S> {
        let request = self.request(prompt, config);

        let value = match self.backend.generate(&request).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(
                    backend = self.backend.name(),
                    model = %config.model,
                    error = %e,
                    "structured extraction failed"
                );
                return None;
            }
        };

        match serde_json::from_value::<S>(value) {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!(
                    backend = self.backend.name(),
                    model = %config.model,
                    error = %e,
                    "response does not match the summary schema"
                );
                None
            }
        }
    }
}
