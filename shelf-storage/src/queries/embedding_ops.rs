//! Embedding BLOB storage: `dimensions` little-endian f32 values per review.

use rusqlite::{params, Connection, OptionalExtension};

use shelf_core::errors::{ShelfResult, StorageError};
use shelf_core::models::ReviewId;

use crate::to_storage_err;

/// Encode an embedding as little-endian f32 bytes.
pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Decode little-endian f32 bytes. Fails if the length is not a multiple of 4.
pub fn bytes_to_f32_vec(review_id: ReviewId, bytes: &[u8]) -> ShelfResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(StorageError::CorruptEmbedding {
            review_id,
            bytes: bytes.len(),
        }
        .into());
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Insert or replace the embedding of a review.
pub fn upsert_embedding(conn: &Connection, review_id: ReviewId, embedding: &[f32]) -> ShelfResult<()> {
    conn.execute(
        "INSERT INTO review_embeddings (review_id, dimensions, embedding)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(review_id) DO UPDATE SET
             dimensions = excluded.dimensions,
             embedding = excluded.embedding,
             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        params![review_id, embedding.len() as i64, f32_vec_to_bytes(embedding)],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// The embedding of a review, if it has one.
pub fn get_embedding(conn: &Connection, review_id: ReviewId) -> ShelfResult<Option<Vec<f32>>> {
    let blob: Option<Vec<u8>> = conn
        .query_row(
            "SELECT embedding FROM review_embeddings WHERE review_id = ?1",
            params![review_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    blob.map(|b| bytes_to_f32_vec(review_id, &b)).transpose()
}
