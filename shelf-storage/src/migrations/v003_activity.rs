//! v003: review_views, review_likes, follows, blocks, muted_books.

use rusqlite::Connection;

use shelf_core::errors::ShelfResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ShelfResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS review_views (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER NOT NULL REFERENCES users(id),
            review_id   INTEGER NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
            viewed_at   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_views_user ON review_views(user_id, viewed_at);

        CREATE TABLE IF NOT EXISTS review_likes (
            user_id     INTEGER NOT NULL REFERENCES users(id),
            review_id   INTEGER NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
            liked_at    TEXT NOT NULL,
            PRIMARY KEY (user_id, review_id)
        );
        CREATE INDEX IF NOT EXISTS idx_likes_user ON review_likes(user_id, liked_at);

        CREATE TABLE IF NOT EXISTS follows (
            follower_id INTEGER NOT NULL REFERENCES users(id),
            followee_id INTEGER NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (follower_id, followee_id)
        );

        CREATE TABLE IF NOT EXISTS blocks (
            blocker_id  INTEGER NOT NULL REFERENCES users(id),
            blocked_id  INTEGER NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (blocker_id, blocked_id)
        );

        CREATE TABLE IF NOT EXISTS muted_books (
            user_id     INTEGER NOT NULL REFERENCES users(id),
            isbn        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (user_id, isbn)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
