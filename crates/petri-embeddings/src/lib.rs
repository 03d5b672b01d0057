//! # petri-embeddings
//!
//! The embedding provider boundary. Wraps an external provider
//! (rate-limited, transiently failing) behind bounded retry with backoff,
//! a primary→fallback degradation chain, and a content-hash keyed cache
//! so unchanged content never re-invokes the provider.

pub mod cache;
pub mod chain;
pub mod engine;
pub mod providers;
pub mod retry;

pub use cache::EmbeddingCache;
pub use chain::ProviderChain;
pub use engine::EmbeddingEngine;
pub use retry::RetryPolicy;
