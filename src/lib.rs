//! # Synopsis
//!
//! Structured, multi-field synopses of long-form articles using LLMs.
//!
//! ## Features
//!
//! - **Structured Intelligence**: The model fills a typed `StructuredSummary` (context, core idea, insights, conclusion)
//! - **Safe Prompts**: Untrusted titles and bodies are escaped before they reach a prompt
//! - **Scrubbed Output**: IPv4 addresses are redacted and captcha pages are rejected
//! - **Provider Agnostic**: Ollama (native API, per-request context size), OpenAI, or Gemini via rstructor
//! - **Never Fails Loudly**: Every failure path ends in `"No summary available"`, one article never blocks a batch

pub mod article;
pub mod assembler;
pub mod backend;
pub mod config;
pub mod extractor;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod prompt;
pub mod sanitize;
pub mod summary;

pub use article::Article;
pub use backend::StructuredBackend;
pub use config::{Config, PipelineConfig};
pub use pipeline::Summarizer;
pub use summary::{StructuredSummary, FALLBACK_SUMMARY};
