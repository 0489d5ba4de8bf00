//! End-to-end scenarios through the public API: expansion, blank input,
//! model failure, and degraded mode.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use email_polisher::abbreviations::AbbreviationDict;
use email_polisher::config::LlmConfig;
use email_polisher::error::LlmError;
use email_polisher::expander::Expander;
use email_polisher::llm::{
    CompletionRequest, LlmBackend, LlmProvider, ModelOutput, ProviderChain,
};
use email_polisher::pipeline::{EmailGraph, EmailState, Stage, build_graph};
use email_polisher::tools::ToolRegistry;
use email_polisher::tools::builtin::{RewriteEmailTool, rewrite_email};

/// Echoes the prompt back and counts calls.
struct EchoLlm {
    calls: AtomicUsize,
}

impl EchoLlm {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl LlmProvider for EchoLlm {
    fn model_name(&self) -> &str {
        "echo"
    }
    fn backend(&self) -> LlmBackend {
        LlmBackend::Anthropic
    }
    async fn complete(&self, request: CompletionRequest) -> Result<ModelOutput, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ModelOutput::Structured {
            content: request.prompt,
        })
    }
}

/// Fails every call with a simulated network error.
struct OfflineLlm;

#[async_trait]
impl LlmProvider for OfflineLlm {
    fn model_name(&self) -> &str {
        "offline"
    }
    fn backend(&self) -> LlmBackend {
        LlmBackend::Anthropic
    }
    async fn complete(&self, _request: CompletionRequest) -> Result<ModelOutput, LlmError> {
        Err(LlmError::RequestFailed {
            provider: "anthropic".into(),
            reason: "network unreachable".into(),
        })
    }
}

fn scenario_expander() -> Arc<Expander> {
    let dict = AbbreviationDict::from_pairs([
        ("ASAP", "as soon as possible"),
        ("Pls", "please"),
        ("thx", "thanks"),
    ])
    .unwrap();
    Arc::new(Expander::new(dict).unwrap())
}

#[tokio::test]
async fn expansion_stage_output_reaches_the_model() {
    let llm = EchoLlm::new();
    let graph = EmailGraph::new(scenario_expander(), llm.clone());

    let state = graph
        .invoke(EmailState::from_input("Pls send ASAP, thx").unwrap())
        .await
        .unwrap();

    assert_eq!(
        state.expanded_email(),
        Some("Pls (please) send ASAP (as soon as possible), thx (thanks)")
    );
    assert!(state
        .polished_email()
        .unwrap()
        .contains("Pls (please) send ASAP (as soon as possible), thx (thanks)"));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn blank_input_never_reaches_the_model() {
    let llm = EchoLlm::new();
    let graph = EmailGraph::new(scenario_expander(), llm.clone());

    for blank in ["", "   ", "\n\n\t"] {
        let out = rewrite_email(&graph, blank).await;
        assert!(out.starts_with("Error:"), "got: {out}");
    }
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn model_failure_is_reported_as_error_string() {
    let graph = EmailGraph::new(scenario_expander(), Arc::new(OfflineLlm));

    let out = rewrite_email(&graph, "Pls send ASAP").await;
    assert!(out.starts_with("Error:"));
    assert!(out.contains("network unreachable"));

    let mut state = EmailState::from_input("Pls send ASAP").unwrap();
    assert!(graph.invoke_in_place(&mut state).await.is_err());
    assert!(state.polished_email().is_none());
    assert_eq!(state.stage(), Stage::Expanded);
}

#[tokio::test]
async fn no_credentials_falls_back_to_rules() {
    let env: HashMap<&str, &str> = HashMap::new();
    let config = LlmConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

    let graph = build_graph(&config).unwrap();
    assert_eq!(graph.llm().backend(), LlmBackend::RuleBased);

    let state = graph
        .invoke(EmailState::from_input("Hi,\nPls send the deck ASAP.\nThanks!").unwrap())
        .await
        .unwrap();
    let polished = state.polished_email().unwrap();

    assert!(!polished.trim().is_empty());
    assert!(polished.starts_with("Subject: Professional Communication"));
    assert!(polished.contains("Dear Sir/Madam,"));
    assert!(polished.contains("please send the deck as soon as possible."));
    assert!(polished.contains("Best regards,"));
}

#[tokio::test]
async fn explicit_rules_backend_skips_remote_even_with_key() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("ANTHROPIC_API_KEY", "sk-ant-test"),
        ("EMAIL_POLISHER_BACKEND", "rules"),
    ]);
    let config = LlmConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

    let chain = ProviderChain::from_config(&config, &AbbreviationDict::default());
    assert_eq!(chain.backends(), vec![LlmBackend::RuleBased]);
}

#[tokio::test]
async fn registry_exposes_rewrite_email_tool() {
    let graph = Arc::new(EmailGraph::new(scenario_expander(), EchoLlm::new()));
    let registry = ToolRegistry::new();
    registry.register(Arc::new(RewriteEmailTool::new(graph))).await;

    let defs = registry.tool_definitions().await;
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "rewrite_email");

    let out = registry
        .call("rewrite_email", serde_json::json!({"email": "thx"}))
        .await
        .unwrap();
    let text = out.as_text().unwrap();
    assert!(text.starts_with("Polished Email:\n\n"));
    assert!(text.contains("thx (thanks)"));
}
