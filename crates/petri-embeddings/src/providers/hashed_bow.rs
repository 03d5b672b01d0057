//! Hashed bag-of-words fallback provider.
//!
//! Produces fixed-dimension vectors by hashing terms into buckets and
//! weighting by term frequency. No external dependencies — works
//! air-gapped, and is fully deterministic, which the test suite relies on.

use std::collections::BTreeMap;

use petri_core::errors::PetriResult;
use petri_core::traits::EmbeddingProvider;

/// Deterministic local embedding provider.
///
/// Not as semantically rich as a neural model, but always available and
/// stable: identical text always yields an identical vector.
pub struct HashedBowProvider {
    dimensions: usize,
}

impl HashedBowProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Hash a term into a bucket index using FNV-1a.
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    /// Tokenize text into lowercase alphanumeric terms.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimensions];
        }

        // BTreeMap gives a fixed iteration order so colliding buckets
        // accumulate floats identically on every call.
        let mut tf: BTreeMap<String, f32> = BTreeMap::new();
        for tok in &tokens {
            *tf.entry(tok.clone()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vec = vec![0.0f32; self.dimensions];

        for (term, count) in &tf {
            let freq = count / total;
            // Longer terms carry more signal; short ones are likely noise.
            let idf = 1.0 + (term.len() as f32).ln();
            let bucket = Self::hash_term(term, self.dimensions);
            vec[bucket] += freq * idf;
        }

        // L2 normalize.
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }

        vec
    }
}

impl EmbeddingProvider for HashedBowProvider {
    fn embed(&self, text: &str) -> PetriResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> PetriResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed-bow"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_has_requested_dimensions() {
        let p = HashedBowProvider::new(64);
        assert_eq!(p.embed("a spinning cube").unwrap().len(), 64);
    }

    #[test]
    fn identical_text_yields_identical_vectors() {
        let p = HashedBowProvider::new(128);
        assert_eq!(p.embed("same text").unwrap(), p.embed("same text").unwrap());
    }

    #[test]
    fn different_text_yields_different_vectors() {
        let p = HashedBowProvider::new(128);
        assert_ne!(
            p.embed("bouncing ball animation").unwrap(),
            p.embed("responsive grid layout").unwrap()
        );
    }

    #[test]
    fn empty_text_yields_zero_vector() {
        let p = HashedBowProvider::new(32);
        assert!(p.embed("").unwrap().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn vectors_are_l2_normalized() {
        let p = HashedBowProvider::new(128);
        let v = p.embed("hover card with shadow").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    proptest::proptest! {
        #[test]
        fn arbitrary_text_embeds_deterministically(text in ".{0,200}") {
            let p = HashedBowProvider::new(32);
            let a = p.embed(&text).unwrap();
            let b = p.embed(&text).unwrap();
            proptest::prop_assert_eq!(&a, &b);
            proptest::prop_assert_eq!(a.len(), 32);
            let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            proptest::prop_assert!(norm <= 1.0 + 1e-4);
        }
    }
}
