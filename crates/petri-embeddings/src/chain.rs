//! Primary → fallback provider chain.

use tracing::warn;

use petri_core::errors::{EmbeddingError, PetriError};
use petri_core::traits::EmbeddingProvider;

/// Ordered chain of providers. The first available provider that
/// succeeds wins; failures degrade to the next link.
pub struct ProviderChain {
    providers: Vec<Box<dyn EmbeddingProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn push(&mut self, provider: Box<dyn EmbeddingProvider>) {
        self.providers.push(provider);
    }

    /// Name of the first available provider.
    pub fn active_provider_name(&self) -> &str {
        self.providers
            .iter()
            .find(|p| p.is_available())
            .map(|p| p.name())
            .unwrap_or("none")
    }

    /// Embed through the chain. Returns the vector and the name of the
    /// provider that produced it.
    pub fn embed(&self, text: &str) -> Result<(Vec<f32>, &str), EmbeddingError> {
        let mut last_error: Option<EmbeddingError> = None;
        for provider in &self.providers {
            if !provider.is_available() {
                continue;
            }
            match provider.embed(text) {
                Ok(vec) => return Ok((vec, provider.name())),
                Err(PetriError::Embedding(e)) => {
                    warn!(provider = provider.name(), error = %e, "provider failed, degrading");
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "provider failed, degrading");
                    last_error = Some(EmbeddingError::ProviderUnavailable {
                        provider: provider.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Err(last_error.unwrap_or(EmbeddingError::ProviderUnavailable {
            provider: "chain".to_string(),
            reason: "no provider in chain".to_string(),
        }))
    }
}

impl Default for ProviderChain {
    fn default() -> Self {
        Self::new()
    }
}
