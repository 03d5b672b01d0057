//! Tournament selection.

use rand::seq::index::sample;
use rand::Rng;

use crate::population::Population;

/// Pick one parent index by tournament: sample `tournament_size` distinct
/// individuals (without replacement within the tournament) and keep the
/// fittest. Tournaments themselves sample with replacement across calls.
pub fn tournament<R: Rng>(population: &Population, tournament_size: usize, rng: &mut R) -> usize {
    let size = tournament_size.min(population.size()).max(1);
    let entrants = sample(rng, population.size(), size);

    entrants
        .iter()
        .max_by(|&a, &b| {
            let fa = population.individuals[a].fitness.unwrap_or(0.0);
            let fb = population.individuals[b].fitness.unwrap_or(0.0);
            fa.partial_cmp(&fb).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Individual;
    use petri_core::pattern::{Pattern, PatternContent, PatternType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population(fitnesses: &[f64]) -> Population {
        let individuals = fitnesses
            .iter()
            .map(|&f| {
                let p = Pattern::new(
                    PatternType::Style,
                    "t",
                    PatternContent::from_html("<div></div>"),
                )
                .unwrap();
                Individual::with_fitness(p, f)
            })
            .collect();
        Population::new(individuals)
    }

    #[test]
    fn full_size_tournament_always_picks_the_best() {
        let pop = population(&[0.1, 0.9, 0.4]);
        let mut rng = StdRng::seed_from_u64(7);
        // Tournament covering the whole population is deterministic.
        assert_eq!(tournament(&pop, 3, &mut rng), 1);
    }

    #[test]
    fn single_individual_population_returns_it() {
        let pop = population(&[0.5]);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(tournament(&pop, 3, &mut rng), 0);
    }

    #[test]
    fn selection_is_reproducible_with_a_seeded_rng() {
        let pop = population(&[0.3, 0.6, 0.2, 0.8, 0.1]);
        let picks_a: Vec<usize> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| tournament(&pop, 3, &mut rng)).collect()
        };
        let picks_b: Vec<usize> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| tournament(&pop, 3, &mut rng)).collect()
        };
        assert_eq!(picks_a, picks_b);
    }
}
