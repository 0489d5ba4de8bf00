//! Error types for the email polisher.

use std::time::Duration;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Expansion error: {0}")]
    Expansion(#[from] ExpansionError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Tool error: {0}")]
    Tool(#[from] crate::tools::ToolError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Prompt template is missing the {{{placeholder}}} placeholder")]
    MissingPlaceholder { placeholder: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Missing credential for provider {provider} (set {env_var})")]
    MissingCredential { provider: String, env_var: String },

    #[error("Backend {backend} unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    #[error("No LLM backend available (tried: {})", attempts.join("; "))]
    NoBackendAvailable { attempts: Vec<String> },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Dictionary / pattern construction errors.
///
/// Expansion itself cannot fail; these only surface while building an
/// [`Expander`](crate::expander::Expander) from a malformed dictionary.
#[derive(Debug, thiserror::Error)]
pub enum ExpansionError {
    #[error("Duplicate abbreviation token: {0}")]
    DuplicateToken(String),

    #[error("Abbreviation token must not be empty (expansion: {expansion})")]
    EmptyToken { expansion: String },

    #[error("Failed to compile abbreviation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Pipeline-related errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Node {node} requires {field}, which is not set")]
    MissingField {
        node: &'static str,
        field: &'static str,
    },

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Expansion failed: {0}")]
    Expansion(#[from] ExpansionError),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(#[from] LlmError),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
