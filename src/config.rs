//! Configuration loading and management for synopsis.
//!
//! Loads settings from `synopsis.toml` with environment variable overrides for
//! tuning values and sensitive data. All values are validated once at load
//! time and read-only afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Content shorter than this (in characters, after trimming) is never sent to a model.
pub const MINIMUM_CONTENT_LENGTH: usize = 300;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing required API key for provider: {0}")]
    MissingApiKey(String),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Values the summarization pipeline needs for every article in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Content is cut to this many characters before prompting
    pub max_content_length: usize,
    /// Output budget handed to the backend
    pub max_summary_length: usize,
    /// Working context size requested from the backend
    pub context_window_size: usize,
    /// Model identifier, also stamped on every processed article
    pub model: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_content_length: 8000,
            max_summary_length: 1024,
            context_window_size: 8192,
            model: "llama3.1".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Build a validated pipeline configuration.
    pub fn new(
        max_content_length: usize,
        max_summary_length: usize,
        context_window_size: usize,
        model: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            max_content_length,
            max_summary_length,
            context_window_size,
            model: model.into(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn minimum_content_length(&self) -> usize {
        MINIMUM_CONTENT_LENGTH
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let numbers = [
            ("max_content_length", self.max_content_length),
            ("max_summary_length", self.max_summary_length),
            ("context_window_size", self.context_window_size),
        ];
        for (field, value) in numbers {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be a positive integer"));
            }
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("model", "must not be empty"));
        }
        Ok(())
    }
}

/// Which LLM backend serves structured output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Ollama's native chat API, the only one that accepts `num_ctx` per request
    #[default]
    Ollama,
    /// OpenAI chat completions (or a server that accepts the same request body)
    OpenAi,
    Gemini,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Ollama => "http://localhost:11434",
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Gemini => "https://generativelanguage.googleapis.com",
        }
    }
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub provider: Provider,
    /// Base URL of the API; the provider's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Ollama,
            base_url: None,
            timeout_secs: 180,
        }
    }
}

impl BackendConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub gemini_key: Option<String>,
    #[serde(default)]
    pub openai_key: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from the default location (synopsis.toml in cwd or home).
    ///
    /// Falls back to built-in defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(path),
            None => {
                let mut config = Config::default();
                config.apply_env(|key| std::env::var(key).ok())?;
                config.pipeline.validate()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.pipeline.validate()?;
        Ok(config)
    }

    /// Parse TOML without touching the environment
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override values from environment variables, as resolved by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("SYNOPSIS_MODEL") {
            self.pipeline.model = model;
        }
        if let Some(value) = lookup("SYNOPSIS_MAX_CONTENT_LENGTH") {
            self.pipeline.max_content_length = parse_positive("max_content_length", &value)?;
        }
        if let Some(value) = lookup("SYNOPSIS_MAX_SUMMARY_LENGTH") {
            self.pipeline.max_summary_length = parse_positive("max_summary_length", &value)?;
        }
        if let Some(value) = lookup("SYNOPSIS_CONTEXT_WINDOW_SIZE") {
            self.pipeline.context_window_size = parse_positive("context_window_size", &value)?;
        }
        if let Some(url) = lookup("SYNOPSIS_BASE_URL") {
            self.backend.base_url = Some(url);
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.api.gemini_key = Some(key);
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.api.openai_key = Some(key);
        }
        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from("synopsis.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("synopsis")
            .join("synopsis.toml");
        home_config.exists().then_some(home_config)
    }

    /// Get the API key for the Gemini provider
    pub fn gemini_key(&self) -> Result<&str, ConfigError> {
        self.api
            .gemini_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingApiKey("gemini".to_string()))
    }

    /// A copy safe to print: keys are masked.
    pub fn redacted(&self) -> Self {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "<redacted>".to_string());
        Self {
            pipeline: self.pipeline.clone(),
            backend: self.backend.clone(),
            api: ApiConfig {
                gemini_key: mask(&self.api.gemini_key),
                openai_key: mask(&self.api.openai_key),
            },
        }
    }
}

fn parse_positive(field: &str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::invalid(field, "must be a positive integer")),
        Ok(n) => Ok(n),
        Err(_) => Err(ConfigError::invalid(
            field,
            format!("'{}' is not a positive integer", value),
        )),
    }
}
