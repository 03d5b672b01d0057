//! Process-wide constants.

/// Default dimensionality of pattern embeddings. Fixed process-wide;
/// every persisted embedding must have exactly this many components
/// unless the store was opened with an explicit override.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

/// Minimum keyword length kept by prompt keyword extraction.
pub const MIN_KEYWORD_LENGTH: usize = 3;

/// Tournament size for evolution parent selection.
pub const TOURNAMENT_SIZE: usize = 3;

/// Admission retries per generation, as a multiple of population size.
pub const ADMISSION_RETRY_FACTOR: u32 = 3;

/// Effectiveness score assigned to freshly admitted patterns that
/// carry no score of their own.
pub const INITIAL_EFFECTIVENESS: f64 = 0.5;
