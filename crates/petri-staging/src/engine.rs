//! PatternStaging — validate candidates, forward the valid ones into the
//! store. Holds no persistent state of its own; the optional scratch map
//! only serves id lookups within a single evolution run.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use petri_core::errors::{PetriResult, ValidationError};
use petri_core::pattern::{Pattern, PatternCandidate, PatternType};
use petri_core::traits::PatternRepository;

/// The staging gate. Takes its store handle at construction; nothing
/// reaches into ambient state.
pub struct PatternStaging {
    store: Arc<dyn PatternRepository>,
    scratch: Mutex<HashMap<String, Pattern>>,
}

impl PatternStaging {
    pub fn new(store: Arc<dyn PatternRepository>) -> Self {
        Self {
            store,
            scratch: Mutex::new(HashMap::new()),
        }
    }

    /// Validate a candidate into a typed `Pattern` without persisting.
    ///
    /// A candidate is valid iff: the type is recognized, the name is
    /// non-empty, content is present, and `content.html` is non-empty.
    /// HTML is deliberately not parsed or sanitized here — rendering is
    /// the consumer's concern.
    pub fn validate(candidate: &PatternCandidate) -> Result<Pattern, ValidationError> {
        let pattern_type = PatternType::parse(&candidate.pattern_type).ok_or_else(|| {
            ValidationError::UnknownType {
                given: candidate.pattern_type.clone(),
            }
        })?;

        let mut missing: Vec<String> = Vec::new();
        if candidate.name.trim().is_empty() {
            missing.push("name".to_string());
        }
        match &candidate.content {
            None => missing.push("content".to_string()),
            Some(content) if content.html_is_empty() => {
                missing.push("content.html".to_string());
            }
            Some(_) => {}
        }
        if !missing.is_empty() {
            return Err(ValidationError::InvalidFields { fields: missing });
        }

        if let Some(score) = candidate.effectiveness_score {
            if !(0.0..=1.0).contains(&score) {
                return Err(ValidationError::ScoreOutOfRange { value: score });
            }
        }

        let content = candidate
            .content
            .clone()
            .unwrap_or_default();
        let mut pattern = Pattern::new(pattern_type, candidate.name.clone(), content)
            .map_err(|_| ValidationError::InvalidFields {
                fields: vec!["content".to_string()],
            })?;
        if let Some(score) = candidate.effectiveness_score {
            pattern.effectiveness_score = score;
        }
        pattern.parent_id = candidate.parent_id.clone();
        Ok(pattern)
    }

    /// Validate and, on success, persist via the store.
    pub fn admit(&self, candidate: PatternCandidate) -> PetriResult<Pattern> {
        let pattern = Self::validate(&candidate)?;
        let stored = self.store.store_pattern(pattern)?;
        debug!(id = %stored.id, "admitted candidate pattern");
        if let Ok(mut scratch) = self.scratch.lock() {
            scratch.insert(stored.id.clone(), stored.clone());
        }
        Ok(stored)
    }

    /// Look up a pattern admitted earlier in this run.
    pub fn lookup(&self, id: &str) -> Option<Pattern> {
        self.scratch.lock().ok()?.get(id).cloned()
    }

    /// Drop the scratch map between evolution runs.
    pub fn clear_scratch(&self) {
        if let Ok(mut scratch) = self.scratch.lock() {
            scratch.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_core::errors::PetriError;
    use petri_core::models::{PromptQueryRecord, UsageContext, UsageStats};
    use petri_core::pattern::PatternContent;
    use petri_core::traits::SimilarPattern;

    /// Minimal in-memory repository for gate tests.
    #[derive(Default)]
    struct StubRepo {
        stored: Mutex<Vec<Pattern>>,
    }

    impl PatternRepository for StubRepo {
        fn store_pattern(&self, pattern: Pattern) -> PetriResult<Pattern> {
            self.stored.lock().unwrap().push(pattern.clone());
            Ok(pattern)
        }

        fn get_pattern(&self, id: &str) -> PetriResult<Option<Pattern>> {
            Ok(self
                .stored
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned())
        }

        fn find_similar_patterns(
            &self,
            _embedding: &[f32],
            _type_filter: Option<PatternType>,
            _threshold: f64,
            _limit: usize,
        ) -> PetriResult<Vec<SimilarPattern>> {
            Ok(vec![])
        }

        fn track_usage(&self, _ctx: &UsageContext) -> PetriResult<()> {
            Ok(())
        }

        fn get_pattern_usage_stats(&self, _pattern_id: &str) -> PetriResult<UsageStats> {
            Ok(UsageStats::empty())
        }

        fn record_prompt_query(&self, _record: &PromptQueryRecord) -> PetriResult<()> {
            Ok(())
        }

        fn mark_prompt_selection(
            &self,
            _record_id: &str,
            _selected_pattern_id: Option<&str>,
            _success_score: Option<f64>,
        ) -> PetriResult<()> {
            Ok(())
        }
    }

    fn candidate(html: &str) -> PatternCandidate {
        PatternCandidate::new("animation", "bounce", PatternContent::from_html(html))
    }

    #[test]
    fn valid_candidate_becomes_pattern() {
        let pattern = PatternStaging::validate(&candidate("<div>ok</div>")).unwrap();
        assert_eq!(pattern.pattern_type, PatternType::Animation);
        assert_eq!(pattern.name, "bounce");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut c = candidate("<div>ok</div>");
        c.pattern_type = "hologram".to_string();
        assert!(matches!(
            PatternStaging::validate(&c),
            Err(ValidationError::UnknownType { .. })
        ));
    }

    #[test]
    fn empty_html_is_rejected_with_field_name() {
        let err = PatternStaging::validate(&candidate("")).unwrap_err();
        match err {
            ValidationError::InvalidFields { fields } => {
                assert_eq!(fields, vec!["content.html".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_content_and_name_reported_together() {
        let c = PatternCandidate {
            pattern_type: "layout".to_string(),
            name: "  ".to_string(),
            content: None,
            effectiveness_score: None,
            parent_id: None,
        };
        let err = PatternStaging::validate(&c).unwrap_err();
        match err {
            ValidationError::InvalidFields { fields } => {
                assert!(fields.contains(&"name".to_string()));
                assert!(fields.contains(&"content".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let mut c = candidate("<div>ok</div>");
        c.effectiveness_score = Some(1.3);
        assert!(matches!(
            PatternStaging::validate(&c),
            Err(ValidationError::ScoreOutOfRange { .. })
        ));
    }

    #[test]
    fn admit_forwards_to_store_and_scratch() {
        let repo = Arc::new(StubRepo::default());
        let staging = PatternStaging::new(repo.clone());
        let stored = staging.admit(candidate("<div>ok</div>")).unwrap();
        assert_eq!(repo.stored.lock().unwrap().len(), 1);
        assert!(staging.lookup(&stored.id).is_some());
        staging.clear_scratch();
        assert!(staging.lookup(&stored.id).is_none());
    }

    #[test]
    fn rejected_candidate_stores_nothing() {
        let repo = Arc::new(StubRepo::default());
        let staging = PatternStaging::new(repo.clone());
        let err = staging.admit(candidate("")).unwrap_err();
        assert!(matches!(err, PetriError::Validation(_)));
        assert!(repo.stored.lock().unwrap().is_empty());
    }
}
