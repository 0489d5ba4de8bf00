//! Prompt template for the polishing node.

use crate::error::ConfigError;

/// Placeholder the expanded email is substituted into.
pub const EXPANDED_EMAIL_PLACEHOLDER: &str = "expanded_email";

/// Default polishing prompt.
pub const DEFAULT_PROMPT: &str = "\
You are an email polishing assistant. Your job is to take a raw email with expanded abbreviations and turn it into a clean, professional format.

Input email:
{expanded_email}

Format:
Subject: ...
Body:
Hi Team,

...

Best regards,
";

/// A prompt with a single `{expanded_email}` placeholder.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Reject templates that never mention the placeholder.
    pub fn new(template: impl Into<String>) -> Result<Self, ConfigError> {
        let template = template.into();
        if !template.contains(&Self::marker()) {
            return Err(ConfigError::MissingPlaceholder {
                placeholder: EXPANDED_EMAIL_PLACEHOLDER.to_string(),
            });
        }
        Ok(Self { template })
    }

    fn marker() -> String {
        format!("{{{EXPANDED_EMAIL_PLACEHOLDER}}}")
    }

    /// Substitute `expanded_email` into every placeholder occurrence.
    pub fn format(&self, expanded_email: &str) -> String {
        self.template.replace(&Self::marker(), expanded_email)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_PROMPT.to_string(),
        }
    }
}
