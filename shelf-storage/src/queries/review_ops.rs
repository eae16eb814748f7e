//! Users, reviews, and the social relations the visibility rules read.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use shelf_core::errors::ShelfResult;
use shelf_core::models::{AccountStatus, PublicationStatus, ReviewId, ReviewRecord, UserId};

use super::format_timestamp;
use crate::to_storage_err;

/// Insert a user, or update handle and status if it exists.
pub fn upsert_user(
    conn: &Connection,
    id: UserId,
    handle: &str,
    status: AccountStatus,
) -> ShelfResult<()> {
    conn.execute(
        "INSERT INTO users (id, handle, status) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET handle = excluded.handle, status = excluded.status",
        params![id, handle, status.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Insert an active user with a generated handle unless it already exists.
pub fn ensure_user(conn: &Connection, id: UserId) -> ShelfResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO users (id, handle) VALUES (?1, ?2)",
        params![id, format!("user{id}")],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Insert or replace a review row. The embedding is stored separately.
pub fn upsert_review(conn: &Connection, review: &ReviewRecord) -> ShelfResult<()> {
    conn.execute(
        "INSERT INTO reviews (id, author_id, isbn, title, body, status, published_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
             author_id = excluded.author_id,
             isbn = excluded.isbn,
             title = excluded.title,
             body = excluded.body,
             status = excluded.status,
             published_at = excluded.published_at",
        params![
            review.id,
            review.author_id,
            review.isbn,
            review.title,
            review.body,
            review.visibility.status.as_str(),
            format_timestamp(&review.published_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn set_review_status(
    conn: &Connection,
    id: ReviewId,
    status: PublicationStatus,
) -> ShelfResult<bool> {
    let changed = conn
        .execute(
            "UPDATE reviews SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed > 0)
}

pub fn review_exists(conn: &Connection, id: ReviewId) -> ShelfResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM reviews WHERE id = ?1", params![id], |row| row.get(0))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(found.is_some())
}

pub fn count_reviews(conn: &Connection) -> ShelfResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}

pub fn insert_view(
    conn: &Connection,
    user_id: UserId,
    review_id: ReviewId,
    at: &DateTime<Utc>,
) -> ShelfResult<()> {
    conn.execute(
        "INSERT INTO review_views (user_id, review_id, viewed_at) VALUES (?1, ?2, ?3)",
        params![user_id, review_id, format_timestamp(at)],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Record a like. Liking again moves it to `at`.
pub fn upsert_like(
    conn: &Connection,
    user_id: UserId,
    review_id: ReviewId,
    at: &DateTime<Utc>,
) -> ShelfResult<()> {
    conn.execute(
        "INSERT INTO review_likes (user_id, review_id, liked_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id, review_id) DO UPDATE SET liked_at = excluded.liked_at",
        params![user_id, review_id, format_timestamp(at)],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn insert_follow(conn: &Connection, follower: UserId, followee: UserId) -> ShelfResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO follows (follower_id, followee_id) VALUES (?1, ?2)",
        params![follower, followee],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn insert_block(conn: &Connection, blocker: UserId, blocked: UserId) -> ShelfResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO blocks (blocker_id, blocked_id) VALUES (?1, ?2)",
        params![blocker, blocked],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn insert_muted_book(conn: &Connection, user_id: UserId, isbn: &str) -> ShelfResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO muted_books (user_id, isbn) VALUES (?1, ?2)",
        params![user_id, isbn],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
