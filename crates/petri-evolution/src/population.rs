//! Population bookkeeping for one evolution run.

use petri_core::pattern::Pattern;

/// One member of a population: a pattern plus its evaluated fitness.
#[derive(Debug, Clone)]
pub struct Individual {
    pub pattern: Pattern,
    /// `None` until the generation's evaluation pass.
    pub fitness: Option<f64>,
}

impl Individual {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            fitness: None,
        }
    }

    pub fn with_fitness(pattern: Pattern, fitness: f64) -> Self {
        Self {
            pattern,
            fitness: Some(fitness),
        }
    }
}

/// A generation's worth of individuals.
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub individuals: Vec<Individual>,
    pub generation: u32,
}

impl Population {
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self {
            individuals,
            generation: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    /// Best evaluated individual, by fitness.
    pub fn best(&self) -> Option<&Individual> {
        self.individuals
            .iter()
            .filter(|i| i.fitness.is_some())
            .max_by(|a, b| {
                a.fitness
                    .partial_cmp(&b.fitness)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Indices of the top `n` evaluated individuals, fitness-descending.
    pub fn top_indices(&self, n: usize) -> Vec<usize> {
        let mut indexed: Vec<(usize, f64)> = self
            .individuals
            .iter()
            .enumerate()
            .filter_map(|(idx, i)| i.fitness.map(|f| (idx, f)))
            .collect();
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        indexed.into_iter().take(n).map(|(idx, _)| idx).collect()
    }
}
