//! Embedding providers.

mod hashed_bow;
mod http_provider;

pub use hashed_bow::HashedBowProvider;
pub use http_provider::HttpProvider;

use petri_core::config::EmbeddingConfig;
use petri_core::traits::EmbeddingProvider;
use tracing::warn;

/// Build the primary provider from config. Falls back to the hashed
/// bag-of-words provider when the http provider is misconfigured.
pub fn create_provider(config: &EmbeddingConfig) -> Box<dyn EmbeddingProvider> {
    match config.provider.as_str() {
        "http" => match HttpProvider::from_config(config) {
            Ok(p) => Box::new(p),
            Err(e) => {
                warn!(error = %e, "http provider unavailable, using hashed fallback");
                Box::new(HashedBowProvider::new(config.dimensions))
            }
        },
        other => {
            if other != "hashed" {
                warn!(provider = other, "unknown provider name, using hashed fallback");
            }
            Box::new(HashedBowProvider::new(config.dimensions))
        }
    }
}
