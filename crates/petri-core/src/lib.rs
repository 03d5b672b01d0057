//! # petri-core
//!
//! Foundation crate for the Petri pattern evolution engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod pattern;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::PetriConfig;
pub use errors::{PetriError, PetriResult};
pub use models::{EvolutionConfig, EvolutionOutcome, QualityAssessment, UsageContext, UsageStats};
pub use pattern::{Pattern, PatternCandidate, PatternContent, PatternType};
