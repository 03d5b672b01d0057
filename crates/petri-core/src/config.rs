//! Workspace configuration, loadable from TOML.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EMBEDDING_DIMENSIONS;
use crate::errors::{PetriError, PetriResult};
use crate::models::EvolutionConfig;

/// Top-level configuration for the engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PetriConfig {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub store: StoreConfig,
    /// Defaults applied to evolution runs that don't pass their own config.
    #[serde(default)]
    pub evolution: EvolutionConfig,
}

impl PetriConfig {
    /// Parse a TOML document. Missing sections fall back to defaults.
    pub fn from_toml_str(s: &str) -> PetriResult<Self> {
        toml::from_str(s).map_err(|e| PetriError::Config {
            reason: e.to_string(),
        })
    }
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "hashed" (local, deterministic) or "http" (OpenAI-compatible).
    pub provider: String,
    /// Endpoint for the http provider, e.g. "https://api.openai.com/v1/embeddings".
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Model name sent to the http provider.
    #[serde(default)]
    pub model: Option<String>,
    pub dimensions: usize,
    /// Hard bound on a single provider call.
    pub timeout_ms: u64,
    /// Bounded retry attempts for transient provider failures.
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub retry_base_delay_ms: u64,
    /// Max entries in the in-memory embedding cache.
    pub l1_cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hashed".to_string(),
            endpoint: None,
            model: None,
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            timeout_ms: 10_000,
            max_retries: 3,
            retry_base_delay_ms: 200,
            l1_cache_size: 10_000,
        }
    }
}

/// Pattern store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file. `None` opens an in-memory store (tests).
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    pub read_pool_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            read_pool_size: 4,
        }
    }
}
