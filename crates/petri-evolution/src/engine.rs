//! The evolution loop: seed a population from the store's nearest
//! neighbors, then select / cross / mutate generation by generation,
//! admitting every changed offspring through the staging gate.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use petri_core::constants::{ADMISSION_RETRY_FACTOR, TOURNAMENT_SIZE};
use petri_core::errors::{EvolutionError, PetriResult};
use petri_core::models::{EvolutionConfig, EvolutionOutcome};
use petri_core::pattern::{Pattern, PatternCandidate, PatternContent};
use petri_core::traits::PatternRepository;
use petri_staging::PatternStaging;

use crate::cancel::CancelToken;
use crate::crossover::crossover;
use crate::fitness::{evaluate, FitnessWeights, SeedProfile};
use crate::mutation::{apply, draw_operator, operators_for};
use crate::population::{Individual, Population};
use crate::selection::tournament;

/// Runs evolution over the pattern corpus. Store and staging handles come
/// in at construction.
pub struct EvolutionEngine {
    store: Arc<dyn PatternRepository>,
    staging: Arc<PatternStaging>,
    weights: FitnessWeights,
}

impl EvolutionEngine {
    pub fn new(store: Arc<dyn PatternRepository>, staging: Arc<PatternStaging>) -> Self {
        Self {
            store,
            staging,
            weights: FitnessWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Run a full evolution from `seed`. Never cancelled.
    pub fn evolve(&self, seed: &Pattern, config: &EvolutionConfig) -> PetriResult<EvolutionOutcome> {
        self.evolve_cancellable(seed, config, &CancelToken::new())
    }

    /// Run a full evolution from `seed`, checking `token` between
    /// generations. Cancellation returns an error; offspring admitted
    /// before the cancelled boundary stay in the store.
    pub fn evolve_cancellable(
        &self,
        seed: &Pattern,
        config: &EvolutionConfig,
        token: &CancelToken,
    ) -> PetriResult<EvolutionOutcome> {
        config.validate()?;
        let mut rng = match config.rng_seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let seed_embedding = self.resolve_seed_embedding(seed)?;
        let profile = SeedProfile::new(seed, seed_embedding);

        let mut population = self.seed_population(seed, &profile, config)?;
        self.evaluate_population(&mut population, &profile);

        let mut best = self
            .best_outcome(&population)
            .ok_or_else(|| EvolutionError::InvalidConfig {
                reason: "initial population could not be evaluated".to_string(),
            })?;
        info!(
            seed_id = %seed.id,
            population = population.size(),
            fitness = best.fitness,
            "evolution run started"
        );
        if best.fitness >= config.fitness_threshold {
            return Ok(best);
        }

        for generation in 1..=config.generation_limit {
            if token.is_cancelled() {
                info!(generation, "evolution run cancelled");
                return Err(EvolutionError::Cancelled { generation }.into());
            }

            population = self.next_generation(&population, config, generation, &mut rng)?;
            self.evaluate_population(&mut population, &profile);

            if let Some(candidate) = self.best_outcome(&population) {
                if candidate.fitness > best.fitness {
                    best = candidate;
                    best.generation = generation;
                }
            }
            debug!(generation, fitness = best.fitness, "generation complete");
            if best.fitness >= config.fitness_threshold {
                best.generation = generation;
                break;
            }
        }

        info!(
            generation = best.generation,
            fitness = best.fitness,
            "evolution run finished"
        );
        Ok(best)
    }

    /// The seed must carry an embedding or have one stored; similarity
    /// seeding and the similarity fitness factor both need it.
    fn resolve_seed_embedding(&self, seed: &Pattern) -> PetriResult<Vec<f32>> {
        if let Some(embedding) = &seed.embedding {
            return Ok(embedding.clone());
        }
        let stored = self
            .store
            .get_pattern(&seed.id)?
            .ok_or_else(|| EvolutionError::SeedNotFound {
                id: seed.id.clone(),
            })?;
        match stored.embedding {
            Some(embedding) => Ok(embedding),
            None => {
                warn!(seed_id = %seed.id, "seed has no stored embedding, similarity factor disabled");
                Ok(Vec::new())
            }
        }
    }

    /// Initial population: the seed itself, its nearest same-type
    /// neighbors, and seed clones as padding.
    fn seed_population(
        &self,
        seed: &Pattern,
        profile: &SeedProfile,
        config: &EvolutionConfig,
    ) -> PetriResult<Population> {
        let mut individuals = vec![Individual::new(seed.clone())];

        if individuals.len() < config.population_size && !profile.embedding.is_empty() {
            let neighbors = self.store.find_similar_patterns(
                &profile.embedding,
                Some(seed.pattern_type),
                config.similarity_threshold,
                config.population_size - 1,
            )?;
            for neighbor in neighbors {
                if neighbor.pattern.id == seed.id {
                    continue;
                }
                if individuals.len() == config.population_size {
                    break;
                }
                individuals.push(Individual::new(neighbor.pattern));
            }
        }

        while individuals.len() < config.population_size {
            individuals.push(Individual::new(seed.clone()));
        }
        Ok(Population::new(individuals))
    }

    fn evaluate_population(&self, population: &mut Population, profile: &SeedProfile) {
        for individual in &mut population.individuals {
            if individual.fitness.is_none() {
                individual.fitness = Some(evaluate(&individual.pattern, profile, &self.weights));
            }
        }
    }

    fn best_outcome(&self, population: &Population) -> Option<EvolutionOutcome> {
        population.best().map(|i| EvolutionOutcome {
            pattern: i.pattern.clone(),
            generation: population.generation,
            fitness: i.fitness.unwrap_or(0.0),
        })
    }

    /// Produce the next generation: elites carried over unchanged, the
    /// rest bred by tournament + crossover + mutation. Changed offspring
    /// go through staging; survivors that came through untouched do not.
    fn next_generation(
        &self,
        current: &Population,
        config: &EvolutionConfig,
        generation: u32,
        rng: &mut StdRng,
    ) -> PetriResult<Population> {
        let mut next: Vec<Individual> = current
            .top_indices(config.elitism_count)
            .into_iter()
            .map(|idx| current.individuals[idx].clone())
            .collect();

        let retry_budget = ADMISSION_RETRY_FACTOR * config.population_size as u32;
        let mut failed_admissions: u32 = 0;

        while next.len() < config.population_size {
            let parent_idx = tournament(current, TOURNAMENT_SIZE, rng);
            let parent = &current.individuals[parent_idx].pattern;

            let mut content = parent.content.clone();
            let mut changed = false;

            if rng.gen_bool(config.crossover_rate) && current.size() > 1 {
                let partner_idx = tournament(current, TOURNAMENT_SIZE, rng);
                if partner_idx != parent_idx {
                    let partner = &current.individuals[partner_idx].pattern;
                    let child = crossover(&content, &partner.content, rng);
                    if child != content {
                        content = child;
                        changed = true;
                    }
                }
            }

            if rng.gen_bool(config.mutation_rate) {
                let operator = draw_operator(operators_for(parent.pattern_type), rng);
                if let Some(mutated) = apply(operator, &content, rng) {
                    if mutated != content {
                        content = mutated;
                        changed = true;
                    }
                }
            }

            if !changed {
                // Untouched survivor: keep the existing pattern without
                // re-admission, fitness already known.
                next.push(current.individuals[parent_idx].clone());
                continue;
            }

            match self.staging.admit(offspring_candidate(parent, content)) {
                Ok(stored) => next.push(Individual::new(stored)),
                Err(err) => {
                    failed_admissions += 1;
                    warn!(generation, error = %err, "offspring rejected at staging");
                    if failed_admissions >= retry_budget {
                        return Err(EvolutionError::GenerationUnfilled {
                            generation,
                            attempts: failed_admissions,
                        }
                        .into());
                    }
                }
            }
        }

        let mut population = Population::new(next);
        population.generation = generation;
        Ok(population)
    }
}

/// Build the staging candidate for a changed offspring. The score is
/// inherited from the parent; the "(evolved)" suffix is applied once.
fn offspring_candidate(parent: &Pattern, content: PatternContent) -> PatternCandidate {
    let name = if parent.name.ends_with(" (evolved)") {
        parent.name.clone()
    } else {
        format!("{} (evolved)", parent.name)
    };
    PatternCandidate {
        pattern_type: parent.pattern_type.as_str().to_string(),
        name,
        content: Some(content),
        effectiveness_score: Some(parent.effectiveness_score.clamp(0.0, 1.0)),
        parent_id: Some(parent.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use petri_core::errors::PetriError;
    use petri_core::models::{PromptQueryRecord, UsageContext, UsageStats};
    use petri_core::pattern::PatternType;
    use petri_core::traits::SimilarPattern;

    /// In-memory repository that fills embeddings with a constant vector.
    #[derive(Default)]
    struct MemRepo {
        patterns: Mutex<Vec<Pattern>>,
    }

    impl PatternRepository for MemRepo {
        fn store_pattern(&self, mut pattern: Pattern) -> PetriResult<Pattern> {
            if pattern.embedding.is_none() {
                pattern.embedding = Some(vec![1.0, 0.0, 0.0]);
            }
            self.patterns.lock().unwrap().push(pattern.clone());
            Ok(pattern)
        }

        fn get_pattern(&self, id: &str) -> PetriResult<Option<Pattern>> {
            Ok(self
                .patterns
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned())
        }

        fn find_similar_patterns(
            &self,
            _embedding: &[f32],
            type_filter: Option<PatternType>,
            _threshold: f64,
            limit: usize,
        ) -> PetriResult<Vec<SimilarPattern>> {
            Ok(self
                .patterns
                .lock()
                .unwrap()
                .iter()
                .filter(|p| type_filter.map_or(true, |t| p.pattern_type == t))
                .take(limit)
                .map(|p| SimilarPattern {
                    pattern: p.clone(),
                    similarity: 0.9,
                })
                .collect())
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

    fn engine() -> (EvolutionEngine, Arc<MemRepo>) {
        let repo = Arc::new(MemRepo::default());
        let staging = Arc::new(PatternStaging::new(repo.clone()));
        (EvolutionEngine::new(repo.clone(), staging), repo)
    }

    fn seed() -> Pattern {
        let mut p = Pattern::new(
            PatternType::Animation,
            "fade",
            PatternContent {
                html: "<div class=\"fade\">x</div>".to_string(),
                css: ".fade { transition: opacity 0.3s; }".to_string(),
                js: String::new(),
                context: String::new(),
                metadata: Default::default(),
            },
        )
        .unwrap();
        p.embedding = Some(vec![1.0, 0.0, 0.0]);
        p.effectiveness_score = 0.8;
        p
    }

    fn config(seed: u64) -> EvolutionConfig {
        EvolutionConfig {
            population_size: 4,
            generation_limit: 3,
            mutation_rate: 0.5,
            crossover_rate: 0.5,
            elitism_count: 1,
            similarity_threshold: 0.7,
            fitness_threshold: 1.0,
            rng_seed: Some(seed),
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_any_work() {
        let (engine, repo) = engine();
        let cfg = EvolutionConfig {
            population_size: 0,
            elitism_count: 0,
            ..config(1)
        };
        let err = engine.evolve(&seed(), &cfg).unwrap_err();
        assert!(matches!(err, PetriError::Evolution(_)));
        assert!(repo.patterns.lock().unwrap().is_empty());
    }

    #[test]
    fn run_returns_an_outcome_within_the_generation_limit() {
        let (engine, _repo) = engine();
        let cfg = config(42);
        let outcome = engine.evolve(&seed(), &cfg).unwrap();
        assert!(outcome.generation <= cfg.generation_limit);
        assert!((0.0..=1.0).contains(&outcome.fitness));
        assert_eq!(outcome.pattern.pattern_type, PatternType::Animation);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let outcome_a = {
            let (engine, _repo) = engine();
            engine.evolve(&seed(), &config(7)).unwrap()
        };
        let outcome_b = {
            let (engine, _repo) = engine();
            engine.evolve(&seed(), &config(7)).unwrap()
        };
        assert_eq!(outcome_a.generation, outcome_b.generation);
        assert_eq!(outcome_a.fitness, outcome_b.fitness);
        assert_eq!(outcome_a.pattern.content, outcome_b.pattern.content);
    }

    #[test]
    fn offspring_in_the_store_link_back_to_a_parent() {
        let (engine, repo) = engine();
        engine.evolve(&seed(), &config(3)).unwrap();
        let stored = repo.patterns.lock().unwrap();
        assert!(stored.iter().all(|p| p.parent_id.is_some()));
    }

    #[test]
    fn cancelled_token_stops_before_the_first_generation() {
        let (engine, _repo) = engine();
        let token = CancelToken::new();
        token.cancel();
        let err = engine
            .evolve_cancellable(&seed(), &config(5), &token)
            .unwrap_err();
        assert!(matches!(
            err,
            PetriError::Evolution(EvolutionError::Cancelled { generation: 1 })
        ));
    }

    #[test]
    fn high_enough_seed_exits_at_generation_zero() {
        let (engine, repo) = engine();
        let mut cfg = config(9);
        cfg.fitness_threshold = 0.0;
        let outcome = engine.evolve(&seed(), &cfg).unwrap();
        assert_eq!(outcome.generation, 0);
        // No offspring were bred, so nothing was admitted.
        assert!(repo.patterns.lock().unwrap().is_empty());
    }

    #[test]
    fn every_generation_keeps_the_population_size() {
        let (engine, _repo) = engine();
        let cfg = config(21);
        let mut rng = StdRng::seed_from_u64(21);

        let current = Population::new(
            (0..cfg.population_size)
                .map(|i| Individual::with_fitness(seed(), 0.1 * i as f64))
                .collect(),
        );
        let next = engine.next_generation(&current, &cfg, 1, &mut rng).unwrap();
        assert_eq!(next.size(), cfg.population_size);
        assert_eq!(next.generation, 1);
    }

    #[test]
    fn elites_carry_the_best_fitness_forward() {
        let (engine, _repo) = engine();
        let cfg = config(8);
        let mut rng = StdRng::seed_from_u64(8);

        let current = Population::new(vec![
            Individual::with_fitness(seed(), 0.2),
            Individual::with_fitness(seed(), 0.9),
            Individual::with_fitness(seed(), 0.4),
            Individual::with_fitness(seed(), 0.1),
        ]);
        let next = engine.next_generation(&current, &cfg, 1, &mut rng).unwrap();
        let carried_best = next
            .individuals
            .iter()
            .filter_map(|i| i.fitness)
            .fold(f64::MIN, f64::max);
        assert!(carried_best >= 0.9);
    }

    /// Repository that refuses every write, to starve admission.
    struct ReadOnlyRepo(MemRepo);

    impl PatternRepository for ReadOnlyRepo {
        fn store_pattern(&self, _pattern: Pattern) -> PetriResult<Pattern> {
            Err(petri_core::errors::StorageError::Sqlite {
                message: "attempt to write a readonly database".to_string(),
            }
            .into())
        }

        fn get_pattern(&self, id: &str) -> PetriResult<Option<Pattern>> {
            self.0.get_pattern(id)
        }

        fn find_similar_patterns(
            &self,
            embedding: &[f32],
            type_filter: Option<PatternType>,
            threshold: f64,
            limit: usize,
        ) -> PetriResult<Vec<SimilarPattern>> {
            self.0
                .find_similar_patterns(embedding, type_filter, threshold, limit)
        }

        fn track_usage(&self, ctx: &UsageContext) -> PetriResult<()> {
            self.0.track_usage(ctx)
        }

        fn get_pattern_usage_stats(&self, pattern_id: &str) -> PetriResult<UsageStats> {
            self.0.get_pattern_usage_stats(pattern_id)
        }

        fn record_prompt_query(&self, record: &PromptQueryRecord) -> PetriResult<()> {
            self.0.record_prompt_query(record)
        }

        fn mark_prompt_selection(
            &self,
            record_id: &str,
            selected_pattern_id: Option<&str>,
            success_score: Option<f64>,
        ) -> PetriResult<()> {
            self.0
                .mark_prompt_selection(record_id, selected_pattern_id, success_score)
        }
    }

    #[test]
    fn exhausted_admission_budget_fails_the_generation() {
        let repo = Arc::new(ReadOnlyRepo(MemRepo::default()));
        let staging = Arc::new(PatternStaging::new(repo.clone()));
        let engine = EvolutionEngine::new(repo, staging);

        // Every offspring mutates, every admission is refused.
        let cfg = EvolutionConfig {
            mutation_rate: 1.0,
            crossover_rate: 0.0,
            ..config(13)
        };
        let err = engine.evolve(&seed(), &cfg).unwrap_err();
        assert!(matches!(
            err,
            PetriError::Evolution(EvolutionError::GenerationUnfilled { generation: 1, .. })
        ));
    }

    #[test]
    fn seed_without_embedding_or_store_entry_fails() {
        let (engine, _repo) = engine();
        let mut s = seed();
        s.embedding = None;
        let err = engine.evolve(&s, &config(2)).unwrap_err();
        assert!(matches!(
            err,
            PetriError::Evolution(EvolutionError::SeedNotFound { .. })
        ));
    }
}
