//! Candidate-pool SQL built from a `CandidateQuery`.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use shelf_core::errors::ShelfResult;
use shelf_core::models::{
    AccountStatus, CandidateQuery, CandidateSort, PublicationStatus, ReviewRecord,
    ReviewVisibility,
};

use super::embedding_ops::bytes_to_f32_vec;
use super::{format_timestamp, parse_timestamp};
use crate::to_storage_err;

// ?1 is always the viewer (NULL when anonymous, which matches no row).
const BLOCKED_EXPR: &str =
    "EXISTS (SELECT 1 FROM blocks b WHERE b.blocker_id = ?1 AND b.blocked_id = r.author_id)";
const MUTED_EXPR: &str =
    "EXISTS (SELECT 1 FROM muted_books m WHERE m.user_id = ?1 AND m.isbn = r.isbn)";

/// SQL text plus positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSql {
    pub sql: String,
    pub params: Vec<Value>,
}

impl CandidateSql {
    fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        format!("?{}", self.params.len())
    }
}

/// Translate a query into SQL.
pub fn build_candidate_sql(query: &CandidateQuery) -> CandidateSql {
    let viewer = query.visibility.viewer.map_or(Value::Null, Value::Integer);
    let mut out = CandidateSql {
        sql: String::new(),
        params: vec![viewer],
    };

    let mut sql = format!(
        "SELECT r.id, r.author_id, r.isbn, r.title, r.body, r.published_at, r.status,
                u.status, e.embedding, {BLOCKED_EXPR}, {MUTED_EXPR}
         FROM reviews r
         JOIN users u ON u.id = r.author_id
         LEFT JOIN review_embeddings e ON e.review_id = r.id
         WHERE 1 = 1"
    );

    let vis = &query.visibility;
    if vis.hide_blocked_authors {
        sql.push_str(&format!(" AND NOT {BLOCKED_EXPR}"));
    }
    if vis.hide_muted_books {
        sql.push_str(&format!(" AND NOT {MUTED_EXPR}"));
    }
    if vis.published_only {
        sql.push_str(" AND r.status = 'published'");
    }
    if vis.active_authors_only {
        sql.push_str(" AND u.status = 'active'");
    }
    if query.require_embedding {
        sql.push_str(" AND e.embedding IS NOT NULL");
    }
    if let Some(author) = query.exclude_author {
        let p = out.bind(Value::Integer(author));
        sql.push_str(&format!(" AND r.author_id != {p}"));
    }
    if let Some(since) = &query.published_since {
        let p = out.bind(Value::Text(format_timestamp(since)));
        sql.push_str(&format!(" AND r.published_at >= {p}"));
    }
    if !query.exclude_ids.is_empty() {
        let placeholders: Vec<String> = query
            .exclude_ids
            .iter()
            .map(|id| out.bind(Value::Integer(*id)))
            .collect();
        sql.push_str(&format!(" AND r.id NOT IN ({})", placeholders.join(", ")));
    }

    sql.push_str(match query.sort {
        CandidateSort::Newest => " ORDER BY r.published_at DESC, r.id DESC",
        CandidateSort::Oldest => " ORDER BY r.published_at ASC, r.id ASC",
        CandidateSort::Id => " ORDER BY r.id ASC",
    });

    if let Some(limit) = query.limit {
        let p = out.bind(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        sql.push_str(&format!(" LIMIT {p}"));
    }

    out.sql = sql;
    out
}

struct RawRow {
    id: i64,
    author_id: i64,
    isbn: String,
    title: String,
    body: String,
    published_at: String,
    status: String,
    author_status: String,
    embedding: Option<Vec<u8>>,
    blocked: bool,
    muted: bool,
}

/// Run a candidate query.
pub fn fetch_candidates(conn: &Connection, query: &CandidateQuery) -> ShelfResult<Vec<ReviewRecord>> {
    let CandidateSql { sql, params } = build_candidate_sql(query);
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            Ok(RawRow {
                id: row.get(0)?,
                author_id: row.get(1)?,
                isbn: row.get(2)?,
                title: row.get(3)?,
                body: row.get(4)?,
                published_at: row.get(5)?,
                status: row.get(6)?,
                author_status: row.get(7)?,
                embedding: row.get(8)?,
                blocked: row.get(9)?,
                muted: row.get(10)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        let embedding = raw
            .embedding
            .as_deref()
            .map(|b| bytes_to_f32_vec(raw.id, b))
            .transpose()?;
        out.push(ReviewRecord {
            id: raw.id,
            author_id: raw.author_id,
            isbn: raw.isbn,
            title: raw.title,
            body: raw.body,
            published_at: parse_timestamp(&raw.published_at)?,
            embedding,
            visibility: ReviewVisibility {
                author_blocked_by_viewer: raw.blocked,
                book_muted_by_viewer: raw.muted,
                author_status: AccountStatus::parse(&raw.author_status).unwrap_or_default(),
                status: PublicationStatus::parse(&raw.status).unwrap_or_default(),
            },
        });
    }
    Ok(out)
}
