//! Configuration types.
//!
//! Everything comes from environment variables; nothing is persisted.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::LlmBackend;

pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen3:0.6b";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MAX_TOKENS: u64 = 1000;
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Which backend the caller prefers. The remaining backends are still tried,
/// in fallback order, if the preferred one cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendSelection {
    /// Anthropic → OpenAI → Ollama → rule-based.
    Auto,
    Prefer(LlmBackend),
}

impl BackendSelection {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "auto" => Some(Self::Auto),
            "anthropic" | "claude" => Some(Self::Prefer(LlmBackend::Anthropic)),
            "openai" | "gpt" => Some(Self::Prefer(LlmBackend::OpenAi)),
            "ollama" | "local" => Some(Self::Prefer(LlmBackend::Ollama)),
            "rules" | "rule-based" | "rule_based" => Some(Self::Prefer(LlmBackend::RuleBased)),
            _ => None,
        }
    }
}

/// Language-model configuration. All values are passed through to the
/// backends untouched; only credential presence is checked.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub selection: BackendSelection,
    pub anthropic_api_key: Option<SecretString>,
    pub anthropic_model: String,
    pub openai_api_key: Option<SecretString>,
    pub openai_model: String,
    /// Ollama is only tried when explicitly enabled (it needs a local daemon).
    pub ollama_enabled: bool,
    pub ollama_model: String,
    pub ollama_base_url: String,
    pub max_tokens: u64,
    pub temperature: f64,
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            selection: BackendSelection::Auto,
            anthropic_api_key: None,
            anthropic_model: DEFAULT_CLAUDE_MODEL.to_string(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            ollama_enabled: false,
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl LlmConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let use_ollama = lookup("USE_OLLAMA")
            .map(|v| v.trim().eq_ignore_ascii_case("true") || v.trim() == "1")
            .unwrap_or(false);

        let selection = match lookup("EMAIL_POLISHER_BACKEND") {
            Some(raw) => BackendSelection::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "EMAIL_POLISHER_BACKEND".to_string(),
                message: format!(
                    "unknown backend '{raw}' (expected auto, anthropic, openai, ollama or rules)"
                ),
            })?,
            None if use_ollama => BackendSelection::Prefer(LlmBackend::Ollama),
            None => BackendSelection::Auto,
        };

        let ollama_enabled = use_ollama
            || selection == BackendSelection::Prefer(LlmBackend::Ollama)
            || lookup("OLLAMA_MODEL").is_some()
            || lookup("OLLAMA_BASE_URL").is_some();

        Ok(Self {
            selection,
            anthropic_api_key: secret(lookup("ANTHROPIC_API_KEY")),
            anthropic_model: lookup("CLAUDE_MODEL").unwrap_or(defaults.anthropic_model),
            openai_api_key: secret(lookup("OPENAI_API_KEY")),
            openai_model: lookup("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            ollama_enabled,
            ollama_model: lookup("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            ollama_base_url: lookup("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            max_tokens: parse_or(&lookup, "EMAIL_POLISHER_MAX_TOKENS", defaults.max_tokens)?,
            temperature: parse_or(&lookup, "EMAIL_POLISHER_TEMPERATURE", defaults.temperature)?,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "EMAIL_POLISHER_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
        })
    }
}

/// Blank credentials count as absent.
fn secret(value: Option<String>) -> Option<SecretString> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("'{raw}': {e}"),
            }),
        None => Ok(default),
    }
}
