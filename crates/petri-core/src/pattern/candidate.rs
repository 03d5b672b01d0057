use serde::{Deserialize, Serialize};

use super::content::PatternContent;

/// A raw, untrusted pattern as it arrives from the host runtime or the
/// evolution loop: string-typed, content optional. The staging gate turns
/// this into a `Pattern` or rejects it with the failing fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternCandidate {
    /// Wire form of the pattern type ("animation", "layout", ...).
    pub pattern_type: String,
    pub name: String,
    pub content: Option<PatternContent>,
    /// Optional initial score; defaults when absent, rejected when
    /// outside [0, 1].
    #[serde(default)]
    pub effectiveness_score: Option<f64>,
    /// Set for evolved offspring.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl PatternCandidate {
    /// Candidate with just type/name/content, the common case.
    pub fn new(
        pattern_type: impl Into<String>,
        name: impl Into<String>,
        content: PatternContent,
    ) -> Self {
        Self {
            pattern_type: pattern_type.into(),
            name: name.into(),
            content: Some(content),
            effectiveness_score: None,
            parent_id: None,
        }
    }
}
