//! SQL query modules, one per concern.

pub mod pattern_crud;
pub mod prompt_ops;
pub mod usage_ops;
pub mod vector_search;
