use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::PatternContent;
use super::types::PatternType;
use crate::constants::INITIAL_EFFECTIVENESS;
use crate::errors::PetriResult;

/// A stored, reusable HTML/CSS/JS snippet plus retrieval and feedback state.
///
/// Mutated in place only for `effectiveness_score` / `usage_count` /
/// `embedding`; never hard-deleted in normal operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    /// UUID v4 identifier, immutable.
    pub id: String,
    /// Pattern family, fixed at creation.
    pub pattern_type: PatternType,
    /// Human-readable label, not required unique.
    pub name: String,
    pub content: PatternContent,
    /// Fixed-dimension embedding of the content. `None` until the store
    /// computes it; recomputed whenever content changes (hash mismatch).
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    /// Quality estimate in [0, 1], rewritten by the feedback recorder.
    pub effectiveness_score: f64,
    /// Recorded usage events.
    pub usage_count: u64,
    /// Set on evolved offspring; `None` for organically stored patterns.
    pub parent_id: Option<String>,
    /// blake3 hash of content, keys the embedding cache.
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Pattern {
    /// Build a fresh pattern with a new id and the default effectiveness.
    pub fn new(
        pattern_type: PatternType,
        name: impl Into<String>,
        content: PatternContent,
    ) -> PetriResult<Self> {
        let content_hash = content.compute_hash()?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            pattern_type,
            name: name.into(),
            content,
            embedding: None,
            effectiveness_score: INITIAL_EFFECTIVENESS,
            usage_count: 0,
            parent_id: None,
            content_hash,
            created_at: Utc::now(),
        })
    }

    /// Clone this pattern into an offspring shell: fresh id, no embedding,
    /// zero usage, `parent_id` pointing back here. Content is replaced by
    /// crossover/mutation before admission.
    pub fn spawn_child(&self, content: PatternContent) -> PetriResult<Self> {
        let content_hash = content.compute_hash()?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            pattern_type: self.pattern_type,
            name: format!("{} (evolved)", self.name),
            content,
            embedding: None,
            effectiveness_score: self.effectiveness_score,
            usage_count: 0,
            parent_id: Some(self.id.clone()),
            content_hash,
            created_at: Utc::now(),
        })
    }

    /// Recompute and replace the content hash after an in-place content edit.
    pub fn refresh_content_hash(&mut self) -> PetriResult<()> {
        self.content_hash = self.content.compute_hash()?;
        // Hash changed means the cached embedding no longer describes
        // the content.
        self.embedding = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Pattern {
        Pattern::new(
            PatternType::Animation,
            "fade-in card",
            PatternContent::from_html("<div class=\"card\">hi</div>"),
        )
        .unwrap()
    }

    #[test]
    fn new_pattern_has_defaults() {
        let p = sample();
        assert_eq!(p.usage_count, 0);
        assert_eq!(p.effectiveness_score, INITIAL_EFFECTIVENESS);
        assert!(p.embedding.is_none());
        assert!(p.parent_id.is_none());
        assert!(!p.content_hash.is_empty());
    }

    #[test]
    fn spawn_child_links_parent_and_resets_state() {
        let p = sample();
        let child = p
            .spawn_child(PatternContent::from_html("<div>mutated</div>"))
            .unwrap();
        assert_eq!(child.parent_id.as_deref(), Some(p.id.as_str()));
        assert_eq!(child.pattern_type, p.pattern_type);
        assert_eq!(child.usage_count, 0);
        assert_ne!(child.id, p.id);
        assert_ne!(child.content_hash, p.content_hash);
    }

    #[test]
    fn refresh_hash_drops_stale_embedding() {
        let mut p = sample();
        p.embedding = Some(vec![0.1, 0.2]);
        p.content.html = "<div>edited</div>".to_string();
        p.refresh_content_hash().unwrap();
        assert!(p.embedding.is_none());
    }
}
