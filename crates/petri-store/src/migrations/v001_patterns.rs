//! v001: patterns, pattern_embeddings, pattern_embedding_link.

use rusqlite::Connection;

use petri_core::errors::PetriResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PetriResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS patterns (
            id                  TEXT PRIMARY KEY,
            pattern_type        TEXT NOT NULL,
            name                TEXT NOT NULL,
            html                TEXT NOT NULL,
            css                 TEXT NOT NULL DEFAULT '',
            js                  TEXT NOT NULL DEFAULT '',
            context             TEXT NOT NULL DEFAULT '',
            metadata            TEXT NOT NULL DEFAULT '{}',
            effectiveness_score REAL NOT NULL,
            usage_count         INTEGER NOT NULL DEFAULT 0,
            parent_id           TEXT,
            content_hash        TEXT NOT NULL,
            created_at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_patterns_type ON patterns(pattern_type);
        CREATE INDEX IF NOT EXISTS idx_patterns_hash ON patterns(content_hash);
        CREATE INDEX IF NOT EXISTS idx_patterns_parent ON patterns(parent_id);

        CREATE TABLE IF NOT EXISTS pattern_embeddings (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            content_hash TEXT NOT NULL UNIQUE,
            embedding    BLOB NOT NULL,
            dimensions   INTEGER NOT NULL,
            model_name   TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS pattern_embedding_link (
            pattern_id   TEXT PRIMARY KEY,
            embedding_id INTEGER NOT NULL,
            FOREIGN KEY (pattern_id) REFERENCES patterns(id),
            FOREIGN KEY (embedding_id) REFERENCES pattern_embeddings(id)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
