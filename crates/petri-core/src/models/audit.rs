use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quality::QualityAssessment;

/// Append-only audit row written once per usage event per matched pattern.
/// Never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectivenessAudit {
    pub pattern_id: String,
    /// Similarity between the prompt and the pattern at retrieval time.
    pub embedding_similarity: f64,
    /// Lower-cased prompt tokens, stop-words removed, min length 3.
    pub prompt_keywords: Vec<String>,
    pub quality: QualityAssessment,
    pub recorded_at: DateTime<Utc>,
}
