//! PatternStore — owns the connection pool and the embedding engine,
//! implements the `PatternRepository` contract.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use petri_core::config::PetriConfig;
use petri_core::errors::{PetriResult, ValidationError};
use petri_core::models::{EffectivenessAudit, PromptQueryRecord, UsageContext, UsageStats};
use petri_core::pattern::{Pattern, PatternType};
use petri_core::traits::{EmbeddingProvider, PatternRepository, SimilarPattern};
use petri_embeddings::EmbeddingEngine;

use crate::effectiveness;
use crate::keywords::extract_keywords;
use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

/// Caller identity attached to a prompt query record.
#[derive(Debug, Clone, Default)]
pub struct PromptQueryMeta {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub project_context: Option<String>,
}

/// The main pattern store. The only shared mutable resource in the
/// system: writes serialize through the single writer connection,
/// reads go to the WAL pool (read-committed).
pub struct PatternStore {
    pool: ConnectionPool,
    embedder: Arc<EmbeddingEngine>,
    /// File-backed mode reads through the pool; in-memory mode routes
    /// reads through the writer (pool connections are isolated DBs).
    use_read_pool: bool,
}

impl PatternStore {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path, embedder: Arc<EmbeddingEngine>, read_pool_size: usize) -> PetriResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size)?;
        let store = Self {
            pool,
            embedder,
            use_read_pool: true,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory(embedder: Arc<EmbeddingEngine>) -> PetriResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let store = Self {
            pool,
            embedder,
            use_read_pool: false,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Convenience constructor wiring the embedder from config.
    pub fn from_config(config: &PetriConfig) -> PetriResult<Self> {
        let embedder = Arc::new(EmbeddingEngine::new(&config.embedding));
        match &config.store.db_path {
            Some(path) => Self::open(path, embedder, config.store.read_pool_size),
            None => Self::open_in_memory(embedder),
        }
    }

    fn initialize(&self) -> PetriResult<()> {
        self.pool
            .writer
            .with_conn(|conn| migrations::run_migrations(conn))
    }

    /// The embedding engine this store was built with.
    pub fn embedder(&self) -> &Arc<EmbeddingEngine> {
        &self.embedder
    }

    fn with_reader<F, T>(&self, f: F) -> PetriResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> PetriResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }

    /// Embed a prompt and run the similarity search, recording a
    /// `PromptQueryRecord` for audit/learning. Returns the matches and
    /// the record id the host later completes via `mark_prompt_selection`.
    pub fn find_similar_for_prompt(
        &self,
        prompt: &str,
        type_filter: Option<PatternType>,
        threshold: f64,
        limit: usize,
        meta: PromptQueryMeta,
    ) -> PetriResult<(Vec<SimilarPattern>, String)> {
        let embedding = self.embedder.embed_prompt(prompt)?;
        let matches = self.find_similar_patterns(&embedding, type_filter, threshold, limit)?;

        let mut record = PromptQueryRecord::new(prompt, embedding);
        record.user_id = meta.user_id;
        record.session_id = meta.session_id;
        record.project_context = meta.project_context;
        record.matched_pattern_ids = matches.iter().map(|m| m.pattern.id.clone()).collect();

        self.record_prompt_query(&record)?;
        debug!(
            record_id = %record.id,
            matches = matches.len(),
            "recorded prompt retrieval"
        );
        Ok((matches, record.id))
    }
}

impl PatternRepository for PatternStore {
    fn store_pattern(&self, mut pattern: Pattern) -> PetriResult<Pattern> {
        if pattern.content.html_is_empty() {
            return Err(ValidationError::InvalidFields {
                fields: vec!["content.html".to_string()],
            }
            .into());
        }
        if !(0.0..=1.0).contains(&pattern.effectiveness_score) {
            return Err(ValidationError::ScoreOutOfRange {
                value: pattern.effectiveness_score,
            }
            .into());
        }

        // Content is authoritative: recompute the hash so a stale one can
        // never key the wrong embedding.
        pattern.content_hash = pattern.content.compute_hash()?;

        // Compute the embedding outside the writer lock; the provider call
        // can be slow and must not block unrelated writes.
        let needs_embedding = pattern
            .embedding
            .as_ref()
            .map(|e| e.len() != self.embedder.dimensions())
            .unwrap_or(true);
        if needs_embedding {
            let text = pattern.content.embedding_text();
            pattern.embedding = Some(self.embedder.embed_content(&pattern.content_hash, &text)?);
        }

        let embedding = pattern
            .embedding
            .clone()
            .unwrap_or_default();
        self.pool.writer.with_conn(|conn| {
            queries::pattern_crud::insert_pattern(conn, &pattern)?;
            queries::vector_search::store_embedding(
                conn,
                &pattern.id,
                &pattern.content_hash,
                &embedding,
                self.embedder.name(),
            )
        })?;

        info!(id = %pattern.id, pattern_type = %pattern.pattern_type, "stored pattern");
        Ok(pattern)
    }

    fn get_pattern(&self, id: &str) -> PetriResult<Option<Pattern>> {
        self.with_reader(|conn| queries::pattern_crud::get_pattern(conn, id))
    }

    fn find_similar_patterns(
        &self,
        embedding: &[f32],
        type_filter: Option<PatternType>,
        threshold: f64,
        limit: usize,
    ) -> PetriResult<Vec<SimilarPattern>> {
        self.with_reader(|conn| {
            queries::vector_search::search_similar(conn, embedding, type_filter, threshold, limit)
        })
    }

    fn track_usage(&self, ctx: &UsageContext) -> PetriResult<()> {
        if !ctx.quality.is_valid() {
            return Err(ValidationError::ScoreOutOfRange {
                value: ctx.quality.mean(),
            }
            .into());
        }

        let prompt_keywords = extract_keywords(&ctx.prompt);
        let new_score = effectiveness::recompute(&ctx.quality);

        // Each matched pattern is its own atomic unit; one failure is
        // logged and must not prevent the others from updating.
        for matched in &ctx.matched_patterns {
            let audit = EffectivenessAudit {
                pattern_id: matched.pattern_id.clone(),
                embedding_similarity: matched.similarity,
                prompt_keywords: prompt_keywords.clone(),
                quality: ctx.quality,
                recorded_at: chrono::Utc::now(),
            };
            let result = self
                .pool
                .writer
                .with_conn(|conn| queries::usage_ops::apply_feedback(conn, &audit, new_score));
            if let Err(e) = result {
                warn!(
                    pattern_id = %matched.pattern_id,
                    error = %e,
                    "failed to record usage for matched pattern"
                );
            }
        }
        Ok(())
    }

    fn get_pattern_usage_stats(&self, pattern_id: &str) -> PetriResult<UsageStats> {
        self.with_reader(|conn| queries::usage_ops::usage_stats(conn, pattern_id))
    }

    fn record_prompt_query(&self, record: &PromptQueryRecord) -> PetriResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::prompt_ops::insert_prompt_query(conn, record))
    }

    fn mark_prompt_selection(
        &self,
        record_id: &str,
        selected_pattern_id: Option<&str>,
        success_score: Option<f64>,
    ) -> PetriResult<()> {
        self.pool.writer.with_conn(|conn| {
            queries::prompt_ops::mark_selection(conn, record_id, selected_pattern_id, success_score)
        })
    }
}
