//! Email polishing pipeline.
//!
//! Every email flows through:
//! 1. `expand_abbr`: deterministic abbreviation expansion (no LLM)
//! 2. `polish_email`: prompt formatting + one LLM call
//!
//! Blank input is rejected before the graph runs. Model failures abort the
//! run; nothing is retried here.

pub mod graph;
pub mod prompt;
pub mod state;

pub use graph::{EmailGraph, Node};
pub use prompt::PromptTemplate;
pub use state::{EmailState, Stage, validate_input};

use std::sync::Arc;

use crate::abbreviations::default_dictionary;
use crate::config::LlmConfig;
use crate::error::Error;
use crate::expander::Expander;
use crate::llm::ProviderChain;

/// Build the graph from configuration: built-in dictionary plus the first
/// backend the fallback chain can construct.
pub fn build_graph(config: &LlmConfig) -> Result<EmailGraph, Error> {
    let dict = default_dictionary();
    let llm = ProviderChain::from_config(config, &dict).resolve()?;
    let expander = Arc::new(Expander::new(dict)?);
    Ok(EmailGraph::new(expander, llm))
}
