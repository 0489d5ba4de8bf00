//! The two-node polishing graph: `expand_abbr` → `polish_email` → end.
//!
//! The graph owns no per-run data. It is built once and can be shared
//! across concurrent invocations; every run gets its own [`EmailState`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::expander::Expander;
use crate::llm::provider::EXPANDED_EMAIL_KEY;
use crate::llm::{CompletionRequest, LlmProvider};
use crate::pipeline::prompt::PromptTemplate;
use crate::pipeline::state::EmailState;

/// A node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    ExpandAbbreviations,
    PolishEmail,
}

impl Node {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExpandAbbreviations => "expand_abbr",
            Self::PolishEmail => "polish_email",
        }
    }
}

/// Fixed execution order. No branches, no cycles.
const NODES: [Node; 2] = [Node::ExpandAbbreviations, Node::PolishEmail];

/// Compiled polishing graph.
#[derive(Clone)]
pub struct EmailGraph {
    expander: Arc<Expander>,
    llm: Arc<dyn LlmProvider>,
    prompt: PromptTemplate,
}

impl EmailGraph {
    pub fn new(expander: Arc<Expander>, llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            expander,
            llm,
            prompt: PromptTemplate::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// Nodes in execution order.
    pub fn nodes(&self) -> &'static [Node] {
        &NODES
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    /// Run the graph to completion, returning the final state.
    pub async fn invoke(&self, mut state: EmailState) -> Result<EmailState, PipelineError> {
        self.invoke_in_place(&mut state).await?;
        Ok(state)
    }

    /// Run the graph against a caller-owned state.
    ///
    /// On failure the state is left at the last stage that completed.
    pub async fn invoke_in_place(&self, state: &mut EmailState) -> Result<(), PipelineError> {
        let run_id = state.run_id();
        info!(%run_id, backend = %self.llm.backend(), "Polishing email");

        for node in self.nodes() {
            debug!(%run_id, node = node.name(), "Entering node");
            if let Err(e) = self.run_node(*node, state).await {
                warn!(%run_id, node = node.name(), error = %e, "Node failed");
                return Err(e);
            }
        }

        info!(%run_id, stage = %state.stage(), "Email polished");
        Ok(())
    }

    /// Validate `raw_email`, run the graph, and return the polished text.
    pub async fn run(&self, raw_email: &str) -> Result<String, PipelineError> {
        let state = self.invoke(EmailState::from_input(raw_email)?).await?;
        state.into_polished().ok_or(PipelineError::MissingField {
            node: Node::PolishEmail.name(),
            field: "polished_email",
        })
    }

    async fn run_node(&self, node: Node, state: &mut EmailState) -> Result<(), PipelineError> {
        match node {
            Node::ExpandAbbreviations => {
                let raw = state.raw_email().ok_or(PipelineError::MissingField {
                    node: node.name(),
                    field: "raw_email",
                })?;
                let expanded = self.expander.expand(raw);
                state.record_expansion(expanded)
            }
            Node::PolishEmail => {
                let expanded = state
                    .expanded_email()
                    .ok_or(PipelineError::MissingField {
                        node: node.name(),
                        field: "expanded_email",
                    })?
                    .to_string();

                let request = CompletionRequest::new(self.prompt.format(&expanded))
                    .with_metadata(EXPANDED_EMAIL_KEY, expanded);

                let output = self.llm.complete(request).await?;
                state.record_polish(output.into_text())
            }
        }
    }
}

impl std::fmt::Debug for EmailGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailGraph")
            .field("nodes", &NODES)
            .field("backend", &self.llm.backend())
            .field("model", &self.llm.model_name())
            .finish()
    }
}
