use serde::{Deserialize, Serialize};

use crate::errors::EvolutionError;
use crate::pattern::Pattern;

/// Parameters for a single evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generation_limit: u32,
    /// Per-offspring mutation probability, [0, 1].
    pub mutation_rate: f64,
    /// Per-pairing crossover probability, [0, 1].
    pub crossover_rate: f64,
    /// Top individuals copied unchanged into the next generation.
    pub elitism_count: usize,
    /// Minimum cosine similarity for seeding neighbors, [0, 1].
    pub similarity_threshold: f64,
    /// Early-exit fitness, [0, 1].
    pub fitness_threshold: f64,
    /// Seed for the run's RNG. `None` seeds from entropy; set it to make
    /// selection/crossover/mutation reproducible.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl EvolutionConfig {
    /// Enforce the config invariants before a run starts.
    pub fn validate(&self) -> Result<(), EvolutionError> {
        if self.population_size == 0 {
            return Err(EvolutionError::InvalidConfig {
                reason: "population_size must be at least 1".to_string(),
            });
        }
        if self.elitism_count >= self.population_size {
            return Err(EvolutionError::InvalidConfig {
                reason: format!(
                    "elitism_count ({}) must be smaller than population_size ({})",
                    self.elitism_count, self.population_size
                ),
            });
        }
        for (name, value) in [
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
            ("similarity_threshold", self.similarity_threshold),
            ("fitness_threshold", self.fitness_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EvolutionError::InvalidConfig {
                    reason: format!("{name} ({value}) outside [0, 1]"),
                });
            }
        }
        Ok(())
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 8,
            generation_limit: 5,
            mutation_rate: 0.3,
            crossover_rate: 0.5,
            elitism_count: 1,
            similarity_threshold: 0.7,
            fitness_threshold: 0.9,
            rng_seed: None,
        }
    }
}

/// Result of a completed evolution run: the best individual found, with
/// the generation and fitness at which it was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    pub pattern: Pattern,
    pub generation: u32,
    pub fitness: f64,
}

/// Which block of a pattern an operator edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorKind {
    Css,
    Js,
}

/// A named mutation operator. The set applicable to a pattern is a pure
/// function of its type (static table in the evolution crate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationOperator {
    pub name: &'static str,
    pub kind: OperatorKind,
    /// Relative draw weight, >= 0.
    pub weight: f64,
}
