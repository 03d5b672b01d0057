//! The pattern domain model: the central `Pattern` entity, its content,
//! its type enum, raw candidates awaiting validation, and the cheap
//! structural feature summary used as a pre-filter before embedding search.

mod base;
mod candidate;
mod content;
pub mod features;
mod types;

pub use base::Pattern;
pub use candidate::PatternCandidate;
pub use content::PatternContent;
pub use features::{extract_pattern_features, PatternFeatures};
pub use types::PatternType;
