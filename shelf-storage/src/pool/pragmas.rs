//! PRAGMA configuration applied to every SQLite connection.
//!
//! Writer: WAL, NORMAL sync, foreign keys ON, configurable busy timeout.
//! Readers: query_only plus the same busy timeout and cache sizing.

use std::time::Duration;

use rusqlite::Connection;

use shelf_core::errors::ShelfResult;

use crate::to_storage_err;

/// Apply the writer's performance and safety pragmas.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u32) -> ShelfResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA mmap_size = 268435456;
        PRAGMA cache_size = -64000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    conn.busy_timeout(Duration::from_millis(u64::from(busy_timeout_ms)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Apply pragmas for a read connection.
pub fn apply_read_pragmas(conn: &Connection, busy_timeout_ms: u32) -> ShelfResult<()> {
    conn.execute_batch(
        "
        PRAGMA query_only = ON;
        PRAGMA mmap_size = 268435456;
        PRAGMA cache_size = -16000;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    conn.busy_timeout(Duration::from_millis(u64::from(busy_timeout_ms)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> ShelfResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
