use serde::{Deserialize, Serialize};

/// Four-dimension quality assessment reported by the host after a pattern
/// was actually shown to an end user. Each component in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub visual: f64,
    pub interactive: f64,
    pub functional: f64,
    pub performance: f64,
}

impl QualityAssessment {
    /// Arithmetic mean of the four components.
    pub fn mean(&self) -> f64 {
        (self.visual + self.interactive + self.functional + self.performance) / 4.0
    }

    /// All components inside [0, 1].
    pub fn is_valid(&self) -> bool {
        [self.visual, self.interactive, self.functional, self.performance]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}
