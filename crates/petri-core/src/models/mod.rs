//! Shared model structs: usage feedback, audit rows, prompt query records,
//! evolution configuration and results.

mod audit;
mod evolution;
mod prompt_record;
mod quality;
mod usage;

pub use audit::EffectivenessAudit;
pub use evolution::{EvolutionConfig, EvolutionOutcome, MutationOperator, OperatorKind};
pub use prompt_record::PromptQueryRecord;
pub use quality::QualityAssessment;
pub use usage::{MatchedPattern, UsageContext, UsageStats};
