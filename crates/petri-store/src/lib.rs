//! # petri-store
//!
//! SQLite persistence for the pattern corpus: pattern rows, deduplicated
//! embedding blobs, prompt query records, and the append-only
//! effectiveness audit log. Single serialized writer + WAL read pool.

pub mod effectiveness;
pub mod engine;
pub mod keywords;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::{PatternStore, PromptQueryMeta};

// The cheap structural pre-filter lives in core; re-exported here because
// it is part of the store's public contract.
pub use petri_core::pattern::features::{extract_pattern_features, PatternFeatures};

use petri_core::errors::{PetriError, StorageError};

/// Shorthand for wrapping rusqlite error strings.
pub(crate) fn to_storage_err(message: impl Into<String>) -> PetriError {
    StorageError::Sqlite {
        message: message.into(),
    }
    .into()
}
