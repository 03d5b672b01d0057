//! The effectiveness update rule.
//!
//! Deliberately a full overwrite, not a blend with history: the new score
//! is the arithmetic mean of the latest quality assessment. Kept behind
//! this one function so a weighted-history policy could replace it
//! without touching any caller.

use petri_core::models::QualityAssessment;

/// Compute the pattern's next effectiveness score from a usage event.
/// The previous score does not participate.
pub fn recompute(quality: &QualityAssessment) -> f64 {
    quality.mean().clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_assessment_yields_one() {
        let q = QualityAssessment {
            visual: 1.0,
            interactive: 1.0,
            functional: 1.0,
            performance: 1.0,
        };
        assert_eq!(recompute(&q), 1.0);
    }

    #[test]
    fn mixed_assessment_is_the_mean() {
        let q = QualityAssessment {
            visual: 0.8,
            interactive: 0.6,
            functional: 1.0,
            performance: 0.6,
        };
        assert!((recompute(&q) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn result_is_clamped_to_unit_interval() {
        let q = QualityAssessment {
            visual: 1.5,
            interactive: 1.5,
            functional: 1.5,
            performance: 1.5,
        };
        assert_eq!(recompute(&q), 1.0);
    }
}
