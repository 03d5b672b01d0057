//! Insert and load pattern rows.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use petri_core::errors::{PetriResult, ValidationError};
use petri_core::pattern::{Pattern, PatternContent, PatternType};

use crate::to_storage_err;

/// Insert a pattern row. The embedding is stored separately (deduplicated
/// by content hash) by `vector_search::store_embedding`.
pub fn insert_pattern(conn: &Connection, pattern: &Pattern) -> PetriResult<()> {
    let metadata_json = serde_json::to_string(&pattern.content.metadata)?;
    conn.execute(
        "INSERT INTO patterns (
            id, pattern_type, name, html, css, js, context, metadata,
            effectiveness_score, usage_count, parent_id, content_hash, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            pattern.id,
            pattern.pattern_type.as_str(),
            pattern.name,
            pattern.content.html,
            pattern.content.css,
            pattern.content.js,
            pattern.content.context,
            metadata_json,
            pattern.effectiveness_score,
            pattern.usage_count as i64,
            pattern.parent_id,
            pattern.content_hash,
            pattern.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Load one pattern by id, embedding included.
pub fn get_pattern(conn: &Connection, id: &str) -> PetriResult<Option<Pattern>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, pattern_type, name, html, css, js, context, metadata,
                    effectiveness_score, usage_count, parent_id, content_hash, created_at
             FROM patterns WHERE id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut rows = stmt
        .query_map(params![id], pattern_from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    match rows.next() {
        Some(row) => {
            let mut pattern = row.map_err(|e| to_storage_err(e.to_string()))??;
            pattern.embedding = super::vector_search::load_embedding(conn, &pattern.id)?;
            Ok(Some(pattern))
        }
        None => Ok(None),
    }
}

/// Map a pattern row (without embedding). Returned as a nested result so
/// type/date parse failures surface as our errors, not rusqlite's.
pub(crate) fn pattern_from_row(row: &Row<'_>) -> rusqlite::Result<PetriResult<Pattern>> {
    let id: String = row.get(0)?;
    let type_str: String = row.get(1)?;
    let name: String = row.get(2)?;
    let html: String = row.get(3)?;
    let css: String = row.get(4)?;
    let js: String = row.get(5)?;
    let context: String = row.get(6)?;
    let metadata_json: String = row.get(7)?;
    let effectiveness_score: f64 = row.get(8)?;
    let usage_count: i64 = row.get(9)?;
    let parent_id: Option<String> = row.get(10)?;
    let content_hash: String = row.get(11)?;
    let created_at_str: String = row.get(12)?;

    Ok(build_pattern(
        id,
        type_str,
        name,
        html,
        css,
        js,
        context,
        metadata_json,
        effectiveness_score,
        usage_count,
        parent_id,
        content_hash,
        created_at_str,
    ))
}

#[allow(clippy::too_many_arguments)]
fn build_pattern(
    id: String,
    type_str: String,
    name: String,
    html: String,
    css: String,
    js: String,
    context: String,
    metadata_json: String,
    effectiveness_score: f64,
    usage_count: i64,
    parent_id: Option<String>,
    content_hash: String,
    created_at_str: String,
) -> PetriResult<Pattern> {
    let pattern_type = PatternType::parse(&type_str)
        .ok_or(ValidationError::UnknownType { given: type_str })?;
    let metadata = serde_json::from_str(&metadata_json)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| to_storage_err(format!("bad created_at: {e}")))?
        .with_timezone(&Utc);

    Ok(Pattern {
        id,
        pattern_type,
        name,
        content: PatternContent {
            html,
            css,
            js,
            context,
            metadata,
        },
        embedding: None,
        effectiveness_score,
        usage_count: usage_count.max(0) as u64,
        parent_id,
        content_hash,
        created_at,
    })
}
