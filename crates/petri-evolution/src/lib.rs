//! # petri-evolution
//!
//! Population-based search over the pattern corpus: similarity-seeded
//! populations, tournament selection, elitism, block crossover, and
//! type-dispatched mutation operators, with every offspring admitted
//! through the staging gate.

pub mod cancel;
pub mod crossover;
pub mod engine;
pub mod fitness;
pub mod mutation;
pub mod population;
pub mod selection;

pub use cancel::CancelToken;
pub use engine::EvolutionEngine;
pub use fitness::FitnessWeights;
pub use mutation::operators_for;
