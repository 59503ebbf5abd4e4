//! Prompt construction: a fixed system instruction plus a per-article payload.

use crate::config::PipelineConfig;
use crate::sanitize::sanitize_input;
use serde::{Deserialize, Serialize};

/// Appended inside the content section when the article was cut to fit.
pub const TRUNCATION_NOTICE: &str = "[Content truncated]";

/// Instruction sent as the system message of every request.
pub const SYSTEM_INSTRUCTION: &str = r#"You are a careful analyst who writes neutral, factual synopses of articles.

Work step by step in the "thinking" field first. The "thinking" field is scratch space and is never shown to the reader.

If the content is missing, unreadable or too thin to summarize, put "No summary available" in "context" and "core_idea" and leave every other field empty.
Use only information stated in the article. Never invent facts, figures, names or quotes.

Fill these fields:
- thinking: your step-by-step reasoning (discarded)
- context: one or two sentences placing the article in its setting
- core_idea: the central idea or claim of the article
- insight_1 to insight_5: the most important supporting insights, one per field, most important first; leave unused ones empty
- author_conclusion: the conclusion the author reaches

Keep the tone neutral and factual. Do not add field names or labels inside the values.
Respond only with the structured fields. Do not write anything outside them."#;

/// Who sent a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// The two halves of a summarization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Build the prompt for one article. `content` must already be truncated.
    pub fn build(title: &str, content: &str, truncated: bool) -> Self {
        Self {
            system: SYSTEM_INSTRUCTION.to_string(),
            user: build_user_payload(title, content, truncated),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.clone()),
            ChatMessage::user(self.user.clone()),
        ]
    }
}

/// Wrap the escaped title and content in tagged sections.
pub fn build_user_payload(title: &str, content: &str, truncated: bool) -> String {
    let mut payload = String::with_capacity(title.len() + content.len() + 64);
    payload.push_str("<title>\n");
    payload.push_str(&sanitize_input(title));
    payload.push_str("\n</title>\n<content>\n");
    payload.push_str(&sanitize_input(content));
    if truncated {
        payload.push('\n');
        payload.push_str(TRUNCATION_NOTICE);
    }
    payload.push_str("\n</content>");
    payload
}

/// Content that passed the length guard, cut to the configured budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedContent<'a> {
    pub text: &'a str,
    pub truncated: bool,
}

/// Apply the minimum-length guard and truncate to `max_content_length` characters.
///
/// Returns `None` when the content is absent or too short to be worth a model call.
pub fn prepare_content<'a>(
    content: Option<&'a str>,
    config: &PipelineConfig,
) -> Option<PreparedContent<'a>> {
    let content = content?;
    if content.trim().chars().count() < config.minimum_content_length() {
        return None;
    }

    let max = config.max_content_length;
    match content.char_indices().nth(max) {
        Some((cut, _)) => Some(PreparedContent {
            text: &content[..cut],
            truncated: true,
        }),
        None => Some(PreparedContent {
            text: content,
            truncated: false,
        }),
    }
}
