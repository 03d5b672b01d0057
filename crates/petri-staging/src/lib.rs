//! # petri-staging
//!
//! The validation gate in front of the pattern store. Every candidate —
//! organic or evolved — passes through here before anything is persisted.

mod engine;

pub use engine::PatternStaging;
