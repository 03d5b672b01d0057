//! EmbeddingEngine — the crate's entry point.
//!
//! Coordinates the provider chain, retry policy, cache, and dimension
//! validation behind a single interface. Implements `EmbeddingProvider`
//! so it can be handed anywhere a provider is expected.

use std::time::Duration;

use tracing::{debug, info};

use petri_core::config::EmbeddingConfig;
use petri_core::errors::{EmbeddingError, PetriResult};
use petri_core::traits::EmbeddingProvider;

use crate::cache::EmbeddingCache;
use crate::chain::ProviderChain;
use crate::providers;
use crate::retry::RetryPolicy;

/// The main embedding engine: chain + retry + cache.
pub struct EmbeddingEngine {
    chain: ProviderChain,
    cache: EmbeddingCache,
    retry: RetryPolicy,
    dimensions: usize,
}

impl EmbeddingEngine {
    /// Build from configuration. The hashed provider is always appended
    /// as the last-resort fallback, so the chain can never be empty.
    pub fn new(config: &EmbeddingConfig) -> Self {
        let mut chain = ProviderChain::new();
        chain.push(providers::create_provider(config));
        chain.push(Box::new(providers::HashedBowProvider::new(
            config.dimensions,
        )));

        let retry = RetryPolicy::new(
            config.max_retries,
            Duration::from_millis(config.retry_base_delay_ms),
        );

        info!(
            provider = chain.active_provider_name(),
            dims = config.dimensions,
            "embedding engine initialized"
        );

        Self {
            chain,
            cache: EmbeddingCache::new(config.l1_cache_size),
            retry,
            dimensions: config.dimensions,
        }
    }

    /// Embed content already identified by its blake3 hash.
    ///
    /// Cache hit skips the provider entirely; miss embeds through the
    /// chain with bounded retry, validates dimensions, and writes through.
    pub fn embed_content(&self, content_hash: &str, text: &str) -> PetriResult<Vec<f32>> {
        if let Some(vec) = self.cache.get(content_hash) {
            debug!(hash = %content_hash, "embedding cache hit");
            return Ok(vec);
        }

        let embedding = self.embed_uncached(text)?;
        self.cache.insert(content_hash.to_string(), embedding.clone());
        Ok(embedding)
    }

    /// Embed a free-form prompt, keyed in the cache by its own hash.
    pub fn embed_prompt(&self, prompt: &str) -> PetriResult<Vec<f32>> {
        let hash = blake3::hash(prompt.as_bytes()).to_hex().to_string();
        self.embed_content(&hash, prompt)
    }

    fn embed_uncached(&self, text: &str) -> PetriResult<Vec<f32>> {
        let (embedding, provider) = self
            .retry
            .run(|| self.chain.embed(text).map(|(v, p)| (v, p.to_string())))?;
        if embedding.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            }
            .into());
        }
        debug!(provider = %provider, "embedded text");
        Ok(embedding)
    }

    /// Direct cache access, used by the store for invalidation on
    /// content rewrites.
    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }
}

impl EmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> PetriResult<Vec<f32>> {
        self.embed_uncached(text)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "petri-embedding-engine"
    }

    fn is_available(&self) -> bool {
        // At least the hashed fallback is always present.
        true
    }
}
