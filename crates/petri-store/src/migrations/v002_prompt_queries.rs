//! v002: prompt_queries (retrieval audit).

use rusqlite::Connection;

use petri_core::errors::PetriResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PetriResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS prompt_queries (
            id                  TEXT PRIMARY KEY,
            prompt_text         TEXT NOT NULL,
            embedding           BLOB NOT NULL,
            dimensions          INTEGER NOT NULL,
            user_id             TEXT,
            session_id          TEXT,
            project_context     TEXT,
            matched_pattern_ids TEXT NOT NULL DEFAULT '[]',
            selected_pattern_id TEXT,
            success_score       REAL,
            created_at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_prompt_queries_created ON prompt_queries(created_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
