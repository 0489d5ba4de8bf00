//! `rewrite_email`: the pipeline as a single callable tool.
//!
//! Failures never cross this boundary as errors: the caller always gets a
//! string, prefixed with `Error:` when something went wrong.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::pipeline::EmailGraph;
use crate::tools::tool::{Tool, ToolError, ToolOutput, require_str};

pub const MISSING_INPUT_MESSAGE: &str =
    "Error: Missing email input. Please provide an email to rewrite.";

const SUCCESS_PREFIX: &str = "Polished Email:\n\n";

/// Rewrite an email, returning a display-ready string.
pub async fn rewrite_email(graph: &EmailGraph, email: &str) -> String {
    match graph.run(email).await {
        Ok(polished) => format!("{SUCCESS_PREFIX}{polished}"),
        Err(PipelineError::InvalidInput(_)) => MISSING_INPUT_MESSAGE.to_string(),
        Err(e) => {
            tracing::error!(error = %e, "rewrite_email failed");
            format!("Error: failed to process email: {e}")
        }
    }
}

/// Tool wrapper around [`rewrite_email`].
pub struct RewriteEmailTool {
    graph: Arc<EmailGraph>,
}

impl RewriteEmailTool {
    pub fn new(graph: Arc<EmailGraph>) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl Tool for RewriteEmailTool {
    fn name(&self) -> &str {
        "rewrite_email"
    }

    fn description(&self) -> &str {
        "Rewrite and polish an email using AI to improve clarity, tone, and \
         professionalism. Abbreviations are expanded before rewriting."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "email": {
                    "type": "string",
                    "description": "The raw email content to be rewritten and polished"
                }
            },
            "required": ["email"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let email = require_str(&params, "email")?;
        let start = Instant::now();
        let text = rewrite_email(&self.graph, email).await;
        Ok(ToolOutput::text(text, start.elapsed()))
    }
}
