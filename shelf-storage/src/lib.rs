//! # shelf-storage
//!
//! SQLite implementation of `IEmbeddingStore` and `IActivityFeed`.
//!
//! One write connection behind an async mutex, a round-robin pool of
//! read-only connections for file-backed databases, versioned migrations,
//! and a moka-backed embedding cache that wraps any store.

pub mod cache;
pub mod import;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod store;

pub use cache::CachedEmbeddingStore;
pub use import::{Dataset, ImportSummary};
pub use store::SqliteStore;

use shelf_core::errors::{ShelfError, StorageError};

/// Wrap a SQLite failure message as a `ShelfError`.
pub(crate) fn to_storage_err(message: String) -> ShelfError {
    ShelfError::StorageError(StorageError::SqliteError { message })
}
