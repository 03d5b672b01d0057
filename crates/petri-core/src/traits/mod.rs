//! Seam traits: the embedding provider boundary and the pattern
//! repository contract that staging and evolution program against.

mod embedding;
mod repository;

pub use embedding::EmbeddingProvider;
pub use repository::{PatternRepository, SimilarPattern};
