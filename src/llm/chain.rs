//! Ordered backend fallback.
//!
//! A [`ProviderChain`] is a list of named factories. [`ProviderChain::resolve`]
//! calls them in order and adopts the first provider that builds; every
//! failure is logged and collected.

use std::sync::Arc;

use tracing::{info, warn};

use crate::abbreviations::AbbreviationDict;
use crate::config::{BackendSelection, LlmConfig};
use crate::error::LlmError;
use crate::llm::{LlmBackend, LlmProvider, create_provider};

/// Builds one provider, or says why it can't.
pub type ProviderFactory = Box<dyn Fn() -> Result<Arc<dyn LlmProvider>, LlmError> + Send + Sync>;

/// Ordered list of backend factories.
pub struct ProviderChain {
    factories: Vec<(LlmBackend, ProviderFactory)>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Append a factory. Order of calls is fallback order.
    pub fn with_factory(mut self, backend: LlmBackend, factory: ProviderFactory) -> Self {
        self.factories.push((backend, factory));
        self
    }

    /// The standard chain for a configuration.
    ///
    /// The preferred backend goes first, followed by every backend after it
    /// in [`LlmBackend::FALLBACK_ORDER`]. `Auto` starts at the top.
    pub fn from_config(config: &LlmConfig, dict: &AbbreviationDict) -> Self {
        let start = match config.selection {
            BackendSelection::Auto => 0,
            BackendSelection::Prefer(backend) => LlmBackend::FALLBACK_ORDER
                .iter()
                .position(|b| *b == backend)
                .unwrap_or(0),
        };

        LlmBackend::FALLBACK_ORDER[start..]
            .iter()
            .fold(Self::new(), |chain, &backend| {
                let config = config.clone();
                let dict = dict.clone();
                chain.with_factory(
                    backend,
                    Box::new(move || create_provider(backend, &config, &dict)),
                )
            })
    }

    /// Backends in the order they will be tried.
    pub fn backends(&self) -> Vec<LlmBackend> {
        self.factories.iter().map(|(b, _)| *b).collect()
    }

    /// Try each factory in turn; first success wins.
    pub fn resolve(&self) -> Result<Arc<dyn LlmProvider>, LlmError> {
        let mut attempts = Vec::new();

        for (backend, factory) in &self.factories {
            match factory() {
                Ok(provider) => {
                    if !attempts.is_empty() {
                        info!(
                            backend = %backend,
                            skipped = attempts.len(),
                            "Fell back to backend"
                        );
                    }
                    return Ok(provider);
                }
                Err(e) => {
                    warn!(backend = %backend, error = %e, "Backend unavailable, trying next");
                    attempts.push(format!("{backend}: {e}"));
                }
            }
        }

        Err(LlmError::NoBackendAvailable { attempts })
    }
}

impl Default for ProviderChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use secrecy::SecretString;

    use super::*;

    fn dict() -> AbbreviationDict {
        AbbreviationDict::default()
    }

    fn unavailable(backend: LlmBackend) -> ProviderFactory {
        Box::new(move || {
            Err(LlmError::BackendUnavailable {
                backend: backend.to_string(),
                reason: "test".into(),
            })
        })
    }

    #[test]
    fn auto_chain_order() {
        let chain = ProviderChain::from_config(&LlmConfig::default(), &dict());
        assert_eq!(chain.backends(), LlmBackend::FALLBACK_ORDER.to_vec());
    }

    #[test]
    fn preferred_backend_goes_first() {
        let config = LlmConfig {
            selection: BackendSelection::Prefer(LlmBackend::Ollama),
            ..LlmConfig::default()
        };
        let chain = ProviderChain::from_config(&config, &dict());
        assert_eq!(
            chain.backends(),
            vec![LlmBackend::Ollama, LlmBackend::RuleBased]
        );
    }

    #[test]
    fn no_credentials_degrades_to_rules() {
        let provider = ProviderChain::from_config(&LlmConfig::default(), &dict())
            .resolve()
            .unwrap();
        assert_eq!(provider.backend(), LlmBackend::RuleBased);
    }

    #[tokio::test]
    async fn credential_present_picks_remote() {
        let config = LlmConfig {
            anthropic_api_key: Some(SecretString::from("test-key")),
            ..LlmConfig::default()
        };
        let provider = ProviderChain::from_config(&config, &dict())
            .resolve()
            .unwrap();
        assert_eq!(provider.backend(), LlmBackend::Anthropic);
    }

    #[test]
    fn enabled_ollama_beats_rules() {
        let config = LlmConfig {
            ollama_enabled: true,
            ..LlmConfig::default()
        };
        let provider = ProviderChain::from_config(&config, &dict())
            .resolve()
            .unwrap();
        assert_eq!(provider.backend(), LlmBackend::Ollama);
    }

    #[test]
    fn stops_at_first_success() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later_calls);
        let d = dict();

        let chain = ProviderChain::new()
            .with_factory(LlmBackend::Anthropic, unavailable(LlmBackend::Anthropic))
            .with_factory(
                LlmBackend::RuleBased,
                Box::new(move || {
                    create_provider(LlmBackend::RuleBased, &LlmConfig::default(), &d)
                }),
            )
            .with_factory(
                LlmBackend::Ollama,
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(LlmError::BackendUnavailable {
                        backend: "ollama".into(),
                        reason: "unused".into(),
                    })
                }),
            );

        let provider = chain.resolve().unwrap();
        assert_eq!(provider.backend(), LlmBackend::RuleBased);
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn all_failures_are_reported() {
        let chain = ProviderChain::new()
            .with_factory(LlmBackend::Anthropic, unavailable(LlmBackend::Anthropic))
            .with_factory(LlmBackend::Ollama, unavailable(LlmBackend::Ollama));

        match chain.resolve() {
            Err(LlmError::NoBackendAvailable { attempts }) => {
                assert_eq!(attempts.len(), 2);
                assert!(attempts[0].starts_with("anthropic"));
                assert!(attempts[1].starts_with("ollama"));
            }
            _ => panic!("expected NoBackendAvailable"),
        }
    }

    #[test]
    fn empty_chain_fails() {
        assert!(ProviderChain::new().resolve().is_err());
    }
}
