//! Multi-factor fitness: effectiveness, structural coverage of the seed,
//! and embedding similarity to the seed.
//!
//! Weights are tunable constants; the contract is monotonicity — raising
//! any one factor while the others hold never lowers fitness.

use petri_core::pattern::features::{extract_pattern_features, PatternFeatures};
use petri_core::pattern::{Pattern, PatternContent};

/// Weights for the three fitness factors. Must sum to 1 so fitness stays
/// inside [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct FitnessWeights {
    pub effectiveness: f64,
    pub coverage: f64,
    pub similarity: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            effectiveness: 0.4,
            coverage: 0.3,
            similarity: 0.3,
        }
    }
}

/// Everything about the seed that fitness evaluation needs, computed once
/// per run.
#[derive(Debug, Clone)]
pub struct SeedProfile {
    pub features: PatternFeatures,
    pub embedding: Vec<f32>,
}

impl SeedProfile {
    pub fn new(seed: &Pattern, embedding: Vec<f32>) -> Self {
        Self {
            features: extract_pattern_features(&combined_markup(&seed.content)),
            embedding,
        }
    }
}

/// Inline the separate css/js fields so feature extraction sees the whole
/// pattern, not just the html body.
pub fn combined_markup(content: &PatternContent) -> String {
    let mut markup = content.html.clone();
    if !content.css.is_empty() {
        markup.push_str("\n<style>");
        markup.push_str(&content.css);
        markup.push_str("</style>");
    }
    if !content.js.is_empty() {
        markup.push_str("\n<script>");
        markup.push_str(&content.js);
        markup.push_str("</script>");
    }
    markup
}

/// Evaluate one individual against the seed. Result in [0, 1].
pub fn evaluate(pattern: &Pattern, seed: &SeedProfile, weights: &FitnessWeights) -> f64 {
    let effectiveness = pattern.effectiveness_score.clamp(0.0, 1.0);

    let features = extract_pattern_features(&combined_markup(&pattern.content));
    let coverage = features.coverage_of(&seed.features);

    let similarity = match &pattern.embedding {
        Some(embedding) => cosine_similarity(embedding, &seed.embedding).max(0.0),
        None => 0.0,
    };

    weights.effectiveness * effectiveness
        + weights.coverage * coverage
        + weights.similarity * similarity
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
