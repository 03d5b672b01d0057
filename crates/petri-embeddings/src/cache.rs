//! In-memory embedding cache keyed by blake3 content hash.
//!
//! TinyLFU admission, size-aware eviction, idle TTL. Absence of an entry
//! is a cache miss, never an error.

use std::time::Duration;

use moka::sync::Cache;

/// Content-hash → embedding side map. Avoids re-invoking the provider
/// for unchanged content.
pub struct EmbeddingCache {
    cache: Cache<String, Vec<f32>>,
}

impl EmbeddingCache {
    /// Create a cache with the given max entry count.
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { cache }
    }

    /// Look up an embedding by content hash.
    pub fn get(&self, content_hash: &str) -> Option<Vec<f32>> {
        self.cache.get(content_hash)
    }

    /// Insert an embedding keyed by content hash.
    pub fn insert(&self, content_hash: String, embedding: Vec<f32>) {
        self.cache.insert(content_hash, embedding);
    }

    /// Drop one entry (content changed, embedding stale).
    pub fn invalidate(&self, content_hash: &str) {
        self.cache.invalidate(content_hash);
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invalidate all entries.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
