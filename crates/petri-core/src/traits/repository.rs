use crate::errors::PetriResult;
use crate::models::{PromptQueryRecord, UsageContext, UsageStats};
use crate::pattern::{Pattern, PatternType};

/// A pattern plus its cosine similarity to the query embedding.
#[derive(Debug, Clone)]
pub struct SimilarPattern {
    pub pattern: Pattern,
    pub similarity: f64,
}

/// The Pattern Store contract. Staging and evolution receive a handle to
/// an implementation at construction; nothing reaches into ambient state.
pub trait PatternRepository: Send + Sync {
    /// Persist a pattern, computing its embedding from content when absent.
    /// Returns the stored pattern with the embedding filled in.
    fn store_pattern(&self, pattern: Pattern) -> PetriResult<Pattern>;

    /// Load a pattern by id. `None` when the id is unknown.
    fn get_pattern(&self, id: &str) -> PetriResult<Option<Pattern>>;

    /// Patterns whose cosine similarity to `embedding` is >= `threshold`,
    /// optionally restricted to one type, similarity-descending, truncated
    /// to `limit`. Empty result is not an error.
    fn find_similar_patterns(
        &self,
        embedding: &[f32],
        type_filter: Option<PatternType>,
        threshold: f64,
        limit: usize,
    ) -> PetriResult<Vec<SimilarPattern>>;

    /// Record a usage event: audit append + effectiveness overwrite +
    /// usage_count increment per matched pattern.
    fn track_usage(&self, ctx: &UsageContext) -> PetriResult<()>;

    /// Aggregate usage stats derived from audit rows.
    fn get_pattern_usage_stats(&self, pattern_id: &str) -> PetriResult<UsageStats>;

    /// Persist the audit record of a prompt-driven retrieval.
    fn record_prompt_query(&self, record: &PromptQueryRecord) -> PetriResult<()>;

    /// Complete a prompt query record with the selection the host made.
    fn mark_prompt_selection(
        &self,
        record_id: &str,
        selected_pattern_id: Option<&str>,
        success_score: Option<f64>,
    ) -> PetriResult<()>;
}
