//! Provider trait and request/response types.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::llm::LlmBackend;

/// Metadata key carrying the expanded email alongside the formatted prompt.
pub const EXPANDED_EMAIL_KEY: &str = "expanded_email";

/// A single-prompt completion request.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Side-channel values the prompt was built from. Model backends ignore
    /// these; the rule-based backend reads [`EXPANDED_EMAIL_KEY`].
    pub metadata: HashMap<String, String>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// What a backend handed back.
///
/// Some clients return bare text, others wrap it in a message envelope.
/// Either way [`ModelOutput::into_text`] is the one place the text is pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutput {
    PlainText(String),
    Structured { content: String },
}

impl ModelOutput {
    /// Normalize to the generated text.
    pub fn into_text(self) -> String {
        match self {
            Self::PlainText(text) => text,
            Self::Structured { content } => content,
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::PlainText(text) => text,
            Self::Structured { content } => content,
        }
    }
}

/// A text-generation backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Which backend this is.
    fn backend(&self) -> LlmBackend;

    /// Generate text for a prompt. No retries; callers see the first failure.
    async fn complete(&self, request: CompletionRequest) -> Result<ModelOutput, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_structured_normalize_to_text() {
        assert_eq!(ModelOutput::PlainText("hi".into()).into_text(), "hi");
        assert_eq!(
            ModelOutput::Structured {
                content: "hello".into()
            }
            .into_text(),
            "hello"
        );
    }

    #[test]
    fn request_metadata_builder() {
        let req = CompletionRequest::new("prompt").with_metadata(EXPANDED_EMAIL_KEY, "body");
        assert_eq!(req.prompt, "prompt");
        assert_eq!(req.metadata.get(EXPANDED_EMAIL_KEY).unwrap(), "body");
    }
}
