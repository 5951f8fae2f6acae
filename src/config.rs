//! Configuration management for lotus-agents
//!
//! Settings are loaded once from environment variables into a [`LotusConfig`]
//! and passed by reference to whatever needs them. Nothing in the pipeline
//! reads the environment on its own.
//!
//! # Environment Variables
//!
//! - `LOTUS_PROVIDER`: anthropic|openai|ollama|gemini|groq|xai - default: "anthropic"
//! - `LOTUS_MODEL` (or `CLAUDE_MODEL`): model name - default: "claude-opus-4-5"
//! - `LOTUS_MAX_TOKENS` (or `CLAUDE_MAX_TOKENS`): tokens per response - default: "8192"
//! - `LOTUS_REQUEST_TIMEOUT`: seconds per generation call - default: "300"
//! - `LOTUS_CONTEXT_CAP`: characters of stage output shared downstream - default: "3000"
//! - `LOTUS_LOG_LEVEL`: logging level - default: "info"
//!
//! Provider credentials are read by genai from the provider's standard
//! variable (`ANTHROPIC_API_KEY`, `OPENAI_API_KEY`, `GEMINI_API_KEY`, ...).

use crate::pipeline::PipelineSettings;
use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "claude-opus-4-5";
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const DEFAULT_CONTEXT_CAP: usize = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
const DEFAULT_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{env_var} environment variable is required for provider {provider}")]
    MissingCredential {
        provider: String,
        env_var: &'static str,
    },

    #[error("Invalid provider: {0}. Valid options: anthropic, openai, ollama, gemini, groq, xai")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone)]
pub struct LotusConfig {
    pub provider: AdapterKind,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub context_cap: usize,
    pub log_level: String,
}

impl Default for LotusConfig {
    fn default() -> Self {
        Self {
            provider: AdapterKind::Anthropic,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            context_cap: DEFAULT_CONTEXT_CAP,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl LotusConfig {
    /// Loads configuration from the environment, falling back to defaults.
    ///
    /// Unparseable numeric values fall back to their defaults; an unknown
    /// provider name is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let provider = match env::var("LOTUS_PROVIDER") {
            Ok(name) => parse_provider(&name)?,
            Err(_) => defaults.provider,
        };

        let model = first_env(&["LOTUS_MODEL", "CLAUDE_MODEL"])
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(defaults.model);

        let max_tokens = first_env(&["LOTUS_MAX_TOKENS", "CLAUDE_MAX_TOKENS"])
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_tokens);

        let request_timeout_secs = env::var("LOTUS_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.request_timeout_secs);

        let context_cap = env::var("LOTUS_CONTEXT_CAP")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.context_cap);

        let log_level = env::var("LOTUS_LOG_LEVEL")
            .unwrap_or(defaults.log_level)
            .to_lowercase();

        Ok(Self {
            provider,
            model,
            max_tokens,
            temperature: defaults.temperature,
            request_timeout_secs,
            context_cap,
            log_level,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name must not be empty".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 3600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 1 hour".to_string(),
            ));
        }

        if self.max_tokens < 256 {
            return Err(ConfigError::ValidationFailed(
                "Max tokens must be at least 256".to_string(),
            ));
        }
        if self.max_tokens > 128_000 {
            return Err(ConfigError::ValidationFailed(
                "Max tokens cannot exceed 128000".to_string(),
            ));
        }

        if self.context_cap == 0 {
            return Err(ConfigError::ValidationFailed(
                "Context cap must be at least 1 character".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(format!(
                "Temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Verifies that the provider's credential variable is set.
    pub fn check_credentials(&self) -> Result<(), ConfigError> {
        match self.provider.default_key_env_name() {
            Some(env_var) if env::var(env_var).map(|v| v.is_empty()).unwrap_or(true) => {
                Err(ConfigError::MissingCredential {
                    provider: self.provider.to_string(),
                    env_var,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            context_cap: self.context_cap,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

impl fmt::Display for LotusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lotus Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider)?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Max Tokens: {}", self.max_tokens)?;
        writeln!(f, "  Temperature: {}", self.temperature)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Context Cap: {} chars", self.context_cap)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    match name.trim().to_lowercase().as_str() {
        "anthropic" | "claude" => Ok(AdapterKind::Anthropic),
        "openai" => Ok(AdapterKind::OpenAI),
        "ollama" => Ok(AdapterKind::Ollama),
        "gemini" => Ok(AdapterKind::Gemini),
        "groq" => Ok(AdapterKind::Groq),
        "xai" | "grok" => Ok(AdapterKind::Xai),
        other => Err(ConfigError::InvalidProvider(other.to_string())),
    }
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env::var(key).ok())
}
