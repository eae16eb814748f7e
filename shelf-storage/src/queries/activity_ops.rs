//! Oldest-first activity lists per category, capped to the most recent entries.

use rusqlite::{params, Connection};

use shelf_core::errors::ShelfResult;
use shelf_core::models::{ActivityCategory, ReviewId, UserId};

use crate::to_storage_err;

/// Distinct reviews a user viewed, by latest view. Repeat views count once.
const VIEWED_SQL: &str = "
    SELECT review_id FROM (
        SELECT review_id, MAX(viewed_at) AS last_at, MAX(id) AS last_id
        FROM review_views
        WHERE user_id = ?1
        GROUP BY review_id
        ORDER BY last_at DESC, last_id DESC
        LIMIT ?2
    )
    ORDER BY last_at ASC, last_id ASC";

const LIKED_SQL: &str = "
    SELECT review_id FROM (
        SELECT review_id, liked_at
        FROM review_likes
        WHERE user_id = ?1
        ORDER BY liked_at DESC, review_id DESC
        LIMIT ?2
    )
    ORDER BY liked_at ASC, review_id ASC";

const FOLLOWED_SQL: &str = "
    SELECT id FROM (
        SELECT r.id, r.published_at
        FROM reviews r
        JOIN follows f ON f.followee_id = r.author_id
        WHERE f.follower_id = ?1 AND r.status = 'published'
        ORDER BY r.published_at DESC, r.id DESC
        LIMIT ?2
    )
    ORDER BY published_at ASC, id ASC";

const OWN_SQL: &str = "
    SELECT id FROM (
        SELECT id, published_at
        FROM reviews
        WHERE author_id = ?1 AND status = 'published'
        ORDER BY published_at DESC, id DESC
        LIMIT ?2
    )
    ORDER BY published_at ASC, id ASC";

/// Review IDs for one user and category, oldest first, at most `limit`.
pub fn review_ids(
    conn: &Connection,
    user_id: UserId,
    category: ActivityCategory,
    limit: usize,
) -> ShelfResult<Vec<ReviewId>> {
    let sql = match category {
        ActivityCategory::Viewed => VIEWED_SQL,
        ActivityCategory::FollowedAuthorReview => FOLLOWED_SQL,
        ActivityCategory::Liked => LIKED_SQL,
        ActivityCategory::OwnReview => OWN_SQL,
    };
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![user_id, limit], |row| row.get::<_, ReviewId>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
