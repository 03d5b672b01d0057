//! v003: effectiveness_audit (append-only).

use rusqlite::Connection;

use petri_core::errors::PetriResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PetriResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS effectiveness_audit (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            pattern_id           TEXT NOT NULL,
            embedding_similarity REAL NOT NULL,
            prompt_keywords      TEXT NOT NULL DEFAULT '[]',
            visual               REAL NOT NULL,
            interactive          REAL NOT NULL,
            functional           REAL NOT NULL,
            performance          REAL NOT NULL,
            recorded_at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_audit_pattern ON effectiveness_audit(pattern_id, recorded_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
