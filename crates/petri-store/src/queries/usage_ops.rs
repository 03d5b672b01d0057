//! Feedback writes: audit append + effectiveness overwrite + usage
//! increment, atomic per pattern. Stats reads over the audit log.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use petri_core::errors::{PetriResult, StorageError};
use petri_core::models::{EffectivenessAudit, UsageStats};

use crate::to_storage_err;

/// Apply one usage event to one pattern: insert the audit row, overwrite
/// the effectiveness score, and increment usage_count, as one SAVEPOINT.
/// The increment is SQL-side (`usage_count + 1`) so no concurrent event
/// can lose it.
pub fn apply_feedback(
    conn: &Connection,
    audit: &EffectivenessAudit,
    new_score: f64,
) -> PetriResult<()> {
    conn.execute_batch("SAVEPOINT apply_feedback")
        .map_err(|e| to_storage_err(format!("apply_feedback savepoint: {e}")))?;

    match apply_feedback_inner(conn, audit, new_score) {
        Ok(()) => {
            conn.execute_batch("RELEASE apply_feedback")
                .map_err(|e| to_storage_err(format!("apply_feedback release: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK TO apply_feedback");
            let _ = conn.execute_batch("RELEASE apply_feedback");
            Err(e)
        }
    }
}

fn apply_feedback_inner(
    conn: &Connection,
    audit: &EffectivenessAudit,
    new_score: f64,
) -> PetriResult<()> {
    let keywords_json = serde_json::to_string(&audit.prompt_keywords)?;

    conn.execute(
        "INSERT INTO effectiveness_audit (
            pattern_id, embedding_similarity, prompt_keywords,
            visual, interactive, functional, performance, recorded_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            audit.pattern_id,
            audit.embedding_similarity,
            keywords_json,
            audit.quality.visual,
            audit.quality.interactive,
            audit.quality.functional,
            audit.quality.performance,
            audit.recorded_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let updated = conn
        .execute(
            "UPDATE patterns
             SET effectiveness_score = ?1, usage_count = usage_count + 1
             WHERE id = ?2",
            params![new_score, audit.pattern_id],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if updated == 0 {
        return Err(StorageError::PatternNotFound {
            id: audit.pattern_id.clone(),
        }
        .into());
    }

    Ok(())
}

/// Aggregate usage stats for one pattern from its audit rows.
pub fn usage_stats(conn: &Connection, pattern_id: &str) -> PetriResult<UsageStats> {
    let row: (u64, f64, Option<String>) = conn
        .query_row(
            "SELECT COUNT(*), COALESCE(AVG(embedding_similarity), 0.0), MAX(recorded_at)
             FROM effectiveness_audit WHERE pattern_id = ?1",
            params![pattern_id],
            |row| Ok((row.get::<_, i64>(0)? as u64, row.get(1)?, row.get(2)?)),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let (total, average_similarity, last_used_str) = row;
    let last_used = match last_used_str {
        Some(s) => Some(
            DateTime::parse_from_rfc3339(&s)
                .map_err(|e| to_storage_err(format!("bad recorded_at: {e}")))?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    Ok(UsageStats {
        total_uses: total,
        // Every audit row currently represents a successful use; there is
        // no partial/negative feedback concept yet.
        successful_uses: total,
        average_similarity,
        last_used,
    })
}
