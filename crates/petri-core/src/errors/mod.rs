//! Error taxonomy for the whole workspace.
//!
//! One enum per subsystem, plus the umbrella `PetriError` that everything
//! converts into at crate boundaries.

mod embedding_error;
mod evolution_error;
mod storage_error;
mod validation_error;

pub use embedding_error::EmbeddingError;
pub use evolution_error::EvolutionError;
pub use storage_error::StorageError;
pub use validation_error::ValidationError;

/// Umbrella error for all Petri subsystems.
#[derive(Debug, thiserror::Error)]
pub enum PetriError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Evolution(#[from] EvolutionError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {reason}")]
    Config { reason: String },
}

/// Result alias used across the workspace.
pub type PetriResult<T> = Result<T, PetriError>;
