use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quality::QualityAssessment;

/// One pattern the retrieval step matched for a prompt, as reported back
/// by the host in a usage event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedPattern {
    pub pattern_id: String,
    /// Cosine similarity at retrieval time.
    pub similarity: f64,
    /// Which parts of the pattern the host's generation actually used.
    #[serde(default)]
    pub features_used: Vec<String>,
}

/// A usage event: the host used some matched patterns to answer a prompt
/// and assessed the result. Feeds the effectiveness recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageContext {
    pub prompt: String,
    pub generated_html: String,
    pub matched_patterns: Vec<MatchedPattern>,
    pub quality: QualityAssessment,
}

/// Aggregate usage statistics for one pattern, derived from audit rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_uses: u64,
    /// Equal to `total_uses` until a partial/negative-feedback concept
    /// exists; kept separate so the schema doesn't change when it does.
    pub successful_uses: u64,
    pub average_similarity: f64,
    pub last_used: Option<DateTime<Utc>>,
}

impl UsageStats {
    /// Stats for a pattern that has never been used.
    pub fn empty() -> Self {
        Self {
            total_uses: 0,
            successful_uses: 0,
            average_similarity: 0.0,
            last_used: None,
        }
    }
}
