//! Embedding persistence and brute-force cosine similarity search.
//!
//! Canonical embedding representation: a little-endian f32 BLOB of exactly
//! `dimensions * 4` bytes, enforced at the write path. No other encoding
//! is ever persisted.

use rusqlite::{params, Connection};

use petri_core::errors::{PetriResult, StorageError};
use petri_core::pattern::PatternType;
use petri_core::traits::SimilarPattern;

use crate::to_storage_err;

/// Store an embedding, deduplicating by content hash, and link it to the
/// pattern. Wrapped in a SAVEPOINT: upsert + lookup + link are
/// all-or-nothing.
pub fn store_embedding(
    conn: &Connection,
    pattern_id: &str,
    content_hash: &str,
    embedding: &[f32],
    model_name: &str,
) -> PetriResult<()> {
    conn.execute_batch("SAVEPOINT store_emb")
        .map_err(|e| to_storage_err(format!("store_embedding savepoint: {e}")))?;

    match store_embedding_inner(conn, pattern_id, content_hash, embedding, model_name) {
        Ok(()) => {
            conn.execute_batch("RELEASE store_emb")
                .map_err(|e| to_storage_err(format!("store_embedding release: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK TO store_emb");
            let _ = conn.execute_batch("RELEASE store_emb");
            Err(e)
        }
    }
}

fn store_embedding_inner(
    conn: &Connection,
    pattern_id: &str,
    content_hash: &str,
    embedding: &[f32],
    model_name: &str,
) -> PetriResult<()> {
    let blob = f32_vec_to_bytes(embedding);
    let dims = embedding.len() as i64;

    conn.execute(
        "INSERT INTO pattern_embeddings (content_hash, embedding, dimensions, model_name)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(content_hash) DO UPDATE SET
            embedding = excluded.embedding,
            dimensions = excluded.dimensions,
            model_name = excluded.model_name",
        params![content_hash, blob, dims, model_name],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let embedding_id: i64 = conn
        .query_row(
            "SELECT id FROM pattern_embeddings WHERE content_hash = ?1",
            params![content_hash],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO pattern_embedding_link (pattern_id, embedding_id)
         VALUES (?1, ?2)
         ON CONFLICT(pattern_id) DO UPDATE SET embedding_id = excluded.embedding_id",
        params![pattern_id, embedding_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}

/// Load the embedding linked to a pattern, if any.
pub fn load_embedding(conn: &Connection, pattern_id: &str) -> PetriResult<Option<Vec<f32>>> {
    let row: Option<(Vec<u8>, i64)> = conn
        .query_row(
            "SELECT pe.embedding, pe.dimensions
             FROM pattern_embedding_link pel
             JOIN pattern_embeddings pe ON pe.id = pel.embedding_id
             WHERE pel.pattern_id = ?1",
            params![pattern_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(to_storage_err(other.to_string())),
        })?;

    match row {
        Some((blob, dims)) => {
            if blob.len() != dims as usize * 4 {
                return Err(StorageError::CorruptEmbedding {
                    content_hash: pattern_id.to_string(),
                    details: format!("blob {} bytes for {} dims", blob.len(), dims),
                }
                .into());
            }
            Ok(Some(bytes_to_f32_vec(&blob)))
        }
        None => Ok(None),
    }
}

/// Cosine similarity search over all stored patterns.
///
/// Returns patterns with similarity >= `threshold`, optionally restricted
/// to one type, similarity-descending. Ties break by higher effectiveness,
/// then by more recent creation. Truncated to `limit`.
pub fn search_similar(
    conn: &Connection,
    query_embedding: &[f32],
    type_filter: Option<PatternType>,
    threshold: f64,
    limit: usize,
) -> PetriResult<Vec<SimilarPattern>> {
    let query_norm_sq: f64 = query_embedding
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum();
    if query_norm_sq == 0.0 || limit == 0 {
        return Ok(vec![]);
    }
    let query_len = query_embedding.len();

    let sql = "SELECT p.id, p.pattern_type, p.name, p.html, p.css, p.js, p.context, p.metadata,
                      p.effectiveness_score, p.usage_count, p.parent_id, p.content_hash,
                      p.created_at, pe.embedding, pe.dimensions
               FROM patterns p
               JOIN pattern_embedding_link pel ON pel.pattern_id = p.id
               JOIN pattern_embeddings pe ON pe.id = pel.embedding_id
               WHERE (?1 IS NULL OR p.pattern_type = ?1)";

    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let type_param: Option<&str> = type_filter.map(|t| t.as_str());

    let rows = stmt
        .query_map(params![type_param], |row| {
            let pattern = super::pattern_crud::pattern_from_row(row)?;
            let blob: Vec<u8> = row.get(13)?;
            let dims: i64 = row.get(14)?;
            Ok((pattern, blob, dims))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scored: Vec<SimilarPattern> = Vec::new();
    for row in rows {
        let (pattern, blob, dims) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let mut pattern = pattern?;
        // Dimension mismatches can't be compared; skip without decoding.
        if dims as usize != query_len {
            continue;
        }
        let stored = bytes_to_f32_vec(&blob);
        let similarity = cosine_similarity(query_embedding, &stored);
        if similarity >= threshold {
            pattern.embedding = Some(stored);
            scored.push(SimilarPattern {
                pattern,
                similarity,
            });
        }
    }

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                b.pattern
                    .effectiveness_score
                    .partial_cmp(&a.pattern.effectiveness_score)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then(b.pattern.created_at.cmp(&a.pattern.created_at))
    });
    scored.truncate(limit);

    Ok(scored)
}

/// Convert f32 slice to bytes (little-endian). The one and only
/// persisted representation.
pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to f32 vec.
pub fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt();
    let norm_b: f64 = b
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_round_trip_preserves_order_and_values() {
        let v: Vec<f32> = (0..1536).map(|i| i as f32 * 0.001).collect();
        let bytes = f32_vec_to_bytes(&v);
        assert_eq!(bytes.len(), 1536 * 4);
        assert_eq!(bytes_to_f32_vec(&bytes), v);
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.5f32, -0.25, 0.75];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let a = vec![1.0f32, 0.0];
        let b = vec![0.0f32, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        let a = vec![0.0f32, 0.0];
        let b = vec![1.0f32, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    proptest::proptest! {
        #[test]
        fn cosine_is_bounded(
            a in proptest::collection::vec(-10.0f32..10.0, 8),
            b in proptest::collection::vec(-10.0f32..10.0, 8),
        ) {
            let sim = cosine_similarity(&a, &b);
            proptest::prop_assert!((-1.0 - 1e-6..=1.0 + 1e-6).contains(&sim));
        }

        #[test]
        fn byte_encoding_round_trips(v in proptest::collection::vec(-1.0f32..1.0, 0..64)) {
            let bytes = f32_vec_to_bytes(&v);
            proptest::prop_assert_eq!(bytes.len(), v.len() * 4);
            proptest::prop_assert_eq!(bytes_to_f32_vec(&bytes), v);
        }
    }
}
