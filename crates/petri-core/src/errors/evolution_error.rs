/// Evolution-run failures. Fatal for the run only; the store is untouched
/// beyond offspring already admitted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvolutionError {
    #[error("generation {generation} could not be filled after {attempts} admission attempts")]
    GenerationUnfilled { generation: u32, attempts: u32 },

    #[error("evolution run cancelled before generation {generation}")]
    Cancelled { generation: u32 },

    #[error("invalid evolution config: {reason}")]
    InvalidConfig { reason: String },

    #[error("seed pattern {id} not found")]
    SeedNotFound { id: String },
}
