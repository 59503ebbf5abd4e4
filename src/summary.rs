//! Summary structs - the structured output requested from the LLM.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Returned in place of a synopsis whenever no usable summary could be produced.
pub const FALLBACK_SUMMARY: &str = "No summary available";

/// A structured output shape the extractor can request from a backend.
///
/// Any schema works as long as it carries a `context` and a `core_idea`
/// field; the remaining fields are rendered in the order returned by
/// [`SummarySchema::body`].
pub trait SummarySchema: DeserializeOwned + JsonSchema + Send {
    /// Name sent to the backend alongside the JSON schema.
    const NAME: &'static str;

    fn context(&self) -> &str;

    fn core_idea(&self) -> &str;

    /// All user-visible fields, in output order. Scratch fields are never included.
    fn body(&self) -> Vec<&str>;
}

/// Structured synopsis output from the LLM.
///
/// The field descriptions below end up in the JSON schema handed to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StructuredSummary {
    /// Step-by-step reasoning scratch space. Never shown to the reader
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    pub thinking: String,
    /// One or two sentences placing the article in its context
    pub context: String,
    /// The central idea or claim of the article
    pub core_idea: String,
    /// First key insight
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    pub insight_1: String,
    /// Second key insight
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    pub insight_2: String,
    /// Third key insight
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    pub insight_3: String,
    /// Fourth key insight
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    pub insight_4: String,
    /// Fifth key insight
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    pub insight_5: String,
    /// The conclusion the author reaches
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    pub author_conclusion: String,
}

impl SummarySchema for StructuredSummary {
    const NAME: &'static str = "structured_summary";

    fn context(&self) -> &str {
        &self.context
    }

    fn core_idea(&self) -> &str {
        &self.core_idea
    }

    fn body(&self) -> Vec<&str> {
        vec![
            &self.context,
            &self.core_idea,
            &self.insight_1,
            &self.insight_2,
            &self.insight_3,
            &self.insight_4,
            &self.insight_5,
            &self.author_conclusion,
        ]
    }
}

/// Optional fields may come back as `null` when the backend does not enforce the schema.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Render the JSON schema for `S` as a plain JSON value.
pub fn schema_value<S: SummarySchema>() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(S)).unwrap_or(serde_json::Value::Null)
}
