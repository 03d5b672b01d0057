use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit record of one retrieval query. Created on every prompt-driven
/// similarity search; completed once when the caller reports which match
/// (if any) it actually used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptQueryRecord {
    pub id: String,
    pub prompt_text: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub project_context: Option<String>,
    /// Ids of the patterns the search returned, similarity-descending.
    pub matched_pattern_ids: Vec<String>,
    /// Set once by `mark_prompt_selection`.
    #[serde(default)]
    pub selected_pattern_id: Option<String>,
    #[serde(default)]
    pub success_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl PromptQueryRecord {
    pub fn new(prompt_text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            prompt_text: prompt_text.into(),
            embedding,
            user_id: None,
            session_id: None,
            project_context: None,
            matched_pattern_ids: Vec::new(),
            selected_pattern_id: None,
            success_score: None,
            created_at: Utc::now(),
        }
    }
}
