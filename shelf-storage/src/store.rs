//! SqliteStore: owns the connections, implements both collaborator traits,
//! and exposes write helpers for seeding.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, warn};

use shelf_core::config::StorageConfig;
use shelf_core::constants::MAX_ACTIVITY_HISTORY;
use shelf_core::errors::{ShelfError, ShelfResult, StorageError};
use shelf_core::models::{
    AccountStatus, ActivityCategory, CandidateQuery, ReviewId, ReviewRecord, UserId,
};
use shelf_core::traits::{IActivityFeed, IEmbeddingStore};

use crate::migrations;
use crate::pool::pragmas::{apply_pragmas, verify_wal_mode};
use crate::pool::{ReadPool, WriteConnection};
use crate::queries::{activity_ops, candidate_ops, embedding_ops, review_ops};
use crate::to_storage_err;

/// SQLite-backed review and activity store.
pub struct SqliteStore {
    writer: WriteConnection,
    /// `None` for in-memory databases: a second in-memory connection would
    /// be a separate database, so reads go through the writer.
    readers: Option<ReadPool>,
    db_path: Option<PathBuf>,
    dimensions: usize,
    activity_history_limit: usize,
}

impl SqliteStore {
    /// Open (and migrate) a database file.
    pub fn open(path: &Path, config: &StorageConfig, dimensions: usize) -> ShelfResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        Self::initialize(&conn, config)?;
        if !verify_wal_mode(&conn)? {
            warn!(path = %path.display(), "journal_mode is not WAL; readers may block on the writer");
        }
        let readers = ReadPool::open(path, config.read_pool_size, config.busy_timeout_ms)?;
        debug!(path = %path.display(), readers = readers.size(), "opened sqlite store");
        Ok(Self {
            writer: WriteConnection::new(conn),
            readers: Some(readers),
            db_path: Some(path.to_path_buf()),
            dimensions,
            activity_history_limit: config.activity_history_limit.min(MAX_ACTIVITY_HISTORY),
        })
    }

    /// Open an in-memory database (tests, one-shot imports).
    pub fn open_in_memory(config: &StorageConfig, dimensions: usize) -> ShelfResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Self::initialize(&conn, config)?;
        Ok(Self {
            writer: WriteConnection::new(conn),
            readers: None,
            db_path: None,
            dimensions,
            activity_history_limit: config.activity_history_limit.min(MAX_ACTIVITY_HISTORY),
        })
    }

    fn initialize(conn: &Connection, config: &StorageConfig) -> ShelfResult<()> {
        apply_pragmas(conn, config.busy_timeout_ms)?;
        migrations::run_migrations(conn)?;
        Ok(())
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Run a read on the read pool (file-backed) or the writer (in-memory).
    ///
    /// The query runs on the blocking pool. Dropping the future (a fetch
    /// timeout or a cancelled request) interrupts it.
    async fn with_reader<F, T>(&self, f: F) -> ShelfResult<T>
    where
        F: FnOnce(&Connection) -> ShelfResult<T> + Send + 'static,
        T: Send + 'static,
    {
        match &self.readers {
            Some(pool) => pool.read(f).await,
            None => self.writer.read(f).await,
        }
    }

    /// Run `f` inside a write transaction.
    pub(crate) async fn with_transaction<F, T>(&self, f: F) -> ShelfResult<T>
    where
        F: FnOnce(&Connection) -> ShelfResult<T>,
    {
        self.writer
            .with_conn(|conn| {
                let tx = conn
                    .unchecked_transaction()
                    .map_err(|e| to_storage_err(e.to_string()))?;
                let out = f(&*tx)?;
                tx.commit().map_err(|e| to_storage_err(e.to_string()))?;
                Ok(out)
            })
            .await
    }

    // ── Seeding ──────────────────────────────────────────────────────────

    pub async fn insert_user(
        &self,
        id: UserId,
        handle: &str,
        status: AccountStatus,
    ) -> ShelfResult<()> {
        self.writer
            .with_conn(|conn| review_ops::upsert_user(conn, id, handle, status))
            .await
    }

    /// Insert a review and, if it carries one, its embedding.
    ///
    /// The author is created if missing. Viewer-relative visibility flags on
    /// the record are ignored; only the publication status is stored.
    pub async fn insert_review(&self, review: &ReviewRecord) -> ShelfResult<()> {
        if let Some(embedding) = review.embedding() {
            self.check_dimensions(embedding)?;
        }
        self.with_transaction(|conn| {
            review_ops::ensure_user(conn, review.author_id)?;
            review_ops::upsert_review(conn, review)?;
            if let Some(embedding) = review.embedding() {
                embedding_ops::upsert_embedding(conn, review.id, embedding)?;
            }
            Ok(())
        })
        .await
    }

    /// Store the embedding of an existing review.
    ///
    /// # Errors
    /// `DimensionMismatch` if the length differs from the configured
    /// dimensionality, `ReviewNotFound` if the review does not exist.
    pub async fn store_embedding(&self, review_id: ReviewId, embedding: &[f32]) -> ShelfResult<()> {
        self.check_dimensions(embedding)?;
        self.writer
            .with_conn(|conn| {
                if !review_ops::review_exists(conn, review_id)? {
                    return Err(ShelfError::ReviewNotFound { id: review_id });
                }
                embedding_ops::upsert_embedding(conn, review_id, embedding)
            })
            .await
    }

    pub async fn record_view(
        &self,
        user_id: UserId,
        review_id: ReviewId,
        at: DateTime<Utc>,
    ) -> ShelfResult<()> {
        self.writer
            .with_conn(|conn| review_ops::insert_view(conn, user_id, review_id, &at))
            .await
    }

    pub async fn record_like(
        &self,
        user_id: UserId,
        review_id: ReviewId,
        at: DateTime<Utc>,
    ) -> ShelfResult<()> {
        self.writer
            .with_conn(|conn| review_ops::upsert_like(conn, user_id, review_id, &at))
            .await
    }

    pub async fn follow(&self, follower: UserId, followee: UserId) -> ShelfResult<()> {
        self.writer
            .with_conn(|conn| review_ops::insert_follow(conn, follower, followee))
            .await
    }

    pub async fn block(&self, blocker: UserId, blocked: UserId) -> ShelfResult<()> {
        self.writer
            .with_conn(|conn| review_ops::insert_block(conn, blocker, blocked))
            .await
    }

    pub async fn mute_book(&self, user_id: UserId, isbn: &str) -> ShelfResult<()> {
        self.writer
            .with_conn(|conn| review_ops::insert_muted_book(conn, user_id, isbn))
            .await
    }

    pub async fn count_reviews(&self) -> ShelfResult<usize> {
        self.with_reader(review_ops::count_reviews).await
    }

    pub(crate) fn check_dimensions(&self, embedding: &[f32]) -> ShelfResult<()> {
        if embedding.len() != self.dimensions {
            return Err(StorageError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            }
            .into());
        }
        Ok(())
    }
}

impl IEmbeddingStore for SqliteStore {
    async fn fetch_embedding(&self, review_id: ReviewId) -> ShelfResult<Option<Vec<f32>>> {
        self.with_reader(move |conn| embedding_ops::get_embedding(conn, review_id))
            .await
    }

    async fn fetch_candidate_pool(&self, query: &CandidateQuery) -> ShelfResult<Vec<ReviewRecord>> {
        let owned = query.clone();
        let pool = self
            .with_reader(move |conn| candidate_ops::fetch_candidates(conn, &owned))
            .await?;
        debug!(
            candidates = pool.len(),
            excluded = query.exclude_ids.len(),
            "candidate pool loaded"
        );
        Ok(pool)
    }
}

impl IActivityFeed for SqliteStore {
    async fn review_ids(
        &self,
        user_id: UserId,
        category: ActivityCategory,
    ) -> ShelfResult<Vec<ReviewId>> {
        let limit = self.activity_history_limit;
        self.with_reader(move |conn| activity_ops::review_ids(conn, user_id, category, limit))
            .await
    }
}
