//! Versioned schema migrations, tracked in `schema_version`.

mod v001_initial_schema;
mod v002_embeddings;
mod v003_activity;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use shelf_core::errors::{ShelfResult, StorageError};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> ShelfResult<()>;

/// Every migration, in order.
const MIGRATIONS: [(u32, MigrationFn); 3] = [
    (1, v001_initial_schema::migrate),
    (2, v002_embeddings::migrate),
    (3, v003_activity::migrate),
];

/// Latest schema version.
pub const LATEST_VERSION: u32 = 3;

/// Current schema version (0 for a fresh database).
pub fn current_version(conn: &Connection) -> ShelfResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .flatten();
    Ok(version.unwrap_or(0))
}

/// Apply every pending migration, each in its own transaction.
///
/// Returns the number of migrations applied.
pub fn run_migrations(conn: &Connection) -> ShelfResult<usize> {
    let current = current_version(conn)?;
    let mut applied = 0;

    for (version, migrate) in MIGRATIONS {
        if version <= current {
            continue;
        }
        let failed = |reason: String| StorageError::MigrationFailed { version, reason };

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| failed(e.to_string()))?;
        migrate(&*tx).map_err(|e| failed(e.to_string()))?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![version],
        )
        .map_err(|e| failed(e.to_string()))?;
        tx.commit().map_err(|e| failed(e.to_string()))?;

        info!(version, "applied migration");
        applied += 1;
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn fresh_database_migrates_to_latest() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(current_version(&conn).unwrap(), 0);
        assert_eq!(run_migrations(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(current_version(&conn).unwrap(), LATEST_VERSION);
        for table in [
            "users",
            "reviews",
            "review_embeddings",
            "review_views",
            "review_likes",
            "follows",
            "blocks",
            "muted_books",
        ] {
            assert!(table_exists(&conn, table), "missing table {table}");
        }
    }

    #[test]
    fn rerunning_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), 0);
        assert_eq!(current_version(&conn).unwrap(), LATEST_VERSION);
    }
}
