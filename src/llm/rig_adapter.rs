//! Bridges a rig-core completion model to [`LlmProvider`].

use async_trait::async_trait;
use rig::agent::{Agent, AgentBuilder};
use rig::completion::{CompletionModel, Prompt};

use crate::error::LlmError;
use crate::llm::{CompletionRequest, LlmBackend, LlmProvider, ModelOutput};

/// Remote provider backed by a rig agent.
pub struct RigAdapter<M: CompletionModel> {
    agent: Agent<M>,
    model_name: String,
    backend: LlmBackend,
}

impl<M: CompletionModel> RigAdapter<M> {
    pub fn new(
        model: M,
        model_name: &str,
        backend: LlmBackend,
        max_tokens: u64,
        temperature: f64,
    ) -> Self {
        let agent = AgentBuilder::new(model)
            .max_tokens(max_tokens)
            .temperature(temperature)
            .build();
        Self {
            agent,
            model_name: model_name.to_string(),
            backend,
        }
    }
}

#[async_trait]
impl<M> LlmProvider for RigAdapter<M>
where
    M: CompletionModel + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn backend(&self) -> LlmBackend {
        self.backend
    }

    async fn complete(&self, request: CompletionRequest) -> Result<ModelOutput, LlmError> {
        tracing::debug!(
            backend = %self.backend,
            model = %self.model_name,
            prompt_chars = request.prompt.len(),
            "Sending completion request"
        );

        let text = self
            .agent
            .prompt(request.prompt.as_str())
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: self.backend.to_string(),
                reason: e.to_string(),
            })?;

        if text.trim().is_empty() {
            return Err(LlmError::InvalidResponse {
                provider: self.backend.to_string(),
                reason: "empty completion".to_string(),
            });
        }

        Ok(ModelOutput::PlainText(text))
    }
}
