//! Prompt query records: insert on retrieval, one-shot selection update.

use rusqlite::{params, Connection};

use petri_core::errors::PetriResult;
use petri_core::models::PromptQueryRecord;

use super::vector_search::f32_vec_to_bytes;
use crate::to_storage_err;

/// Insert the audit record of one retrieval query.
pub fn insert_prompt_query(conn: &Connection, record: &PromptQueryRecord) -> PetriResult<()> {
    let matched_json = serde_json::to_string(&record.matched_pattern_ids)?;
    conn.execute(
        "INSERT INTO prompt_queries (
            id, prompt_text, embedding, dimensions, user_id, session_id,
            project_context, matched_pattern_ids, selected_pattern_id,
            success_score, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            record.id,
            record.prompt_text,
            f32_vec_to_bytes(&record.embedding),
            record.embedding.len() as i64,
            record.user_id,
            record.session_id,
            record.project_context,
            matched_json,
            record.selected_pattern_id,
            record.success_score,
            record.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Record which match (if any) the caller actually used. Applied once;
/// later calls overwrite, which is fine for an audit field the host owns.
pub fn mark_selection(
    conn: &Connection,
    record_id: &str,
    selected_pattern_id: Option<&str>,
    success_score: Option<f64>,
) -> PetriResult<()> {
    conn.execute(
        "UPDATE prompt_queries
         SET selected_pattern_id = ?1, success_score = ?2
         WHERE id = ?3",
        params![selected_pattern_id, success_score, record_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
