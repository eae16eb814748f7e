//! v002: review_embeddings (little-endian f32 BLOBs).

use rusqlite::Connection;

use shelf_core::errors::ShelfResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ShelfResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS review_embeddings (
            review_id   INTEGER PRIMARY KEY REFERENCES reviews(id) ON DELETE CASCADE,
            dimensions  INTEGER NOT NULL,
            embedding   BLOB NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
