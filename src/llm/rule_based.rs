//! Degraded mode: deterministic rewrite with no model behind it.
//!
//! Collapses `"TOKEN (expansion)"` annotations back to the expansion, swaps a
//! handful of informal phrases for formal ones, and wraps the body in a fixed
//! subject line and sign-off.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::abbreviations::AbbreviationDict;
use crate::error::LlmError;
use crate::llm::provider::EXPANDED_EMAIL_KEY;
use crate::llm::{CompletionRequest, LlmBackend, LlmProvider, ModelOutput};

const SUBJECT_LINE: &str = "Subject: Professional Communication";
const CLOSING_LINE: &str = "Thank you for your time.";
const EMPTY_BODY: &str = "(no content)";

/// A single phrase substitution.
struct PhraseRule {
    regex: Regex,
    replacement: &'static str,
}

static PHRASE_RULES: LazyLock<Vec<PhraseRule>> = LazyLock::new(|| {
    [
        (r"(?m)^Hi,", "Dear Sir/Madam,"),
        (r"(?m)^(?:Hey|Yo)\b,?", "Hello,"),
        (r"Thanks!", "Best regards,"),
        (r"\bASAP\b", "as soon as possible"),
        (r"\bkinda\b", "somewhat"),
        (r"\bgonna\b", "going to"),
        (r"\bwanna\b", "want to"),
        (r"\bgotta\b", "have to"),
        (r"\bdunno\b", "do not know"),
        (r"\byeah\b", "yes"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
        Ok(regex) => Some(PhraseRule { regex, replacement }),
        Err(e) => {
            tracing::error!(pattern, error = %e, "Invalid phrase rule");
            None
        }
    })
    .collect()
});

/// Rule-based provider used when no model backend is available.
pub struct RuleBasedProvider {
    dict: AbbreviationDict,
}

impl RuleBasedProvider {
    pub fn new(dict: AbbreviationDict) -> Self {
        Self { dict }
    }

    /// Rewrite `text` into the fixed professional layout. Never empty.
    pub fn polish(&self, text: &str) -> String {
        let mut body = text.trim().to_string();

        for entry in self.dict.entries() {
            let annotated = format!("{} ({})", entry.token, entry.expansion);
            if body.contains(&annotated) {
                body = body.replace(&annotated, &entry.expansion);
            }
        }

        for rule in PHRASE_RULES.iter() {
            body = rule.regex.replace_all(&body, rule.replacement).into_owned();
        }

        if body.is_empty() {
            body = EMPTY_BODY.to_string();
        }

        format!("{SUBJECT_LINE}\n\n{body}\n\n{CLOSING_LINE}")
    }
}

#[async_trait]
impl LlmProvider for RuleBasedProvider {
    fn model_name(&self) -> &str {
        "rule-based"
    }

    fn backend(&self) -> LlmBackend {
        LlmBackend::RuleBased
    }

    async fn complete(&self, request: CompletionRequest) -> Result<ModelOutput, LlmError> {
        let source = request
            .metadata
            .get(EXPANDED_EMAIL_KEY)
            .map(String::as_str)
            .unwrap_or(&request.prompt);
        Ok(ModelOutput::PlainText(self.polish(source)))
    }
}
