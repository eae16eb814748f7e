//! v001: users, reviews.

use rusqlite::Connection;

use shelf_core::errors::ShelfResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ShelfResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY,
            handle      TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'active',
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS reviews (
            id           INTEGER PRIMARY KEY,
            author_id    INTEGER NOT NULL REFERENCES users(id),
            isbn         TEXT NOT NULL,
            title        TEXT NOT NULL,
            body         TEXT NOT NULL DEFAULT '',
            status       TEXT NOT NULL DEFAULT 'published',
            published_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_reviews_author ON reviews(author_id);
        CREATE INDEX IF NOT EXISTS idx_reviews_published ON reviews(published_at);
        CREATE INDEX IF NOT EXISTS idx_reviews_isbn ON reviews(isbn);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
