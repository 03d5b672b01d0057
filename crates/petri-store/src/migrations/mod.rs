//! Versioned schema migrations, tracked via `PRAGMA user_version`.

mod v001_patterns;
mod v002_prompt_queries;
mod v003_effectiveness_audit;

use rusqlite::Connection;
use tracing::info;

use petri_core::errors::{PetriResult, StorageError};

use crate::to_storage_err;

/// Latest schema version.
pub const SCHEMA_VERSION: u32 = 3;

/// Run all pending migrations on a connection.
pub fn run_migrations(conn: &Connection) -> PetriResult<()> {
    let current = user_version(conn)?;

    for version in (current + 1)..=SCHEMA_VERSION {
        let result = match version {
            1 => v001_patterns::migrate(conn),
            2 => v002_prompt_queries::migrate(conn),
            3 => v003_effectiveness_audit::migrate(conn),
            _ => unreachable!("no migration registered for version {version}"),
        };
        result.map_err(|e| StorageError::MigrationFailed {
            version,
            reason: e.to_string(),
        })?;
        set_user_version(conn, version)?;
        info!(version, "applied schema migration");
    }

    Ok(())
}

fn user_version(conn: &Connection) -> PetriResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

fn set_user_version(conn: &Connection, version: u32) -> PetriResult<()> {
    conn.pragma_update(None, "user_version", version)
        .map_err(|e| to_storage_err(e.to_string()))
}
