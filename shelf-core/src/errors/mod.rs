mod fetch_error;
mod storage_error;
mod vector_error;

pub use fetch_error::FetchError;
pub use storage_error::StorageError;
pub use vector_error::VectorError;

use crate::models::ReviewId;

/// Top-level error for the recommendation engine.
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    #[error("review not found: {id}")]
    ReviewNotFound { id: ReviewId },

    #[error("invalid limit {requested}: must be between 1 and {max}")]
    InvalidLimit { requested: usize, max: usize },

    #[error("vector error: {0}")]
    VectorError(#[from] VectorError),

    #[error("fetch error: {0}")]
    FetchError(#[from] FetchError),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ShelfError {
    /// Whether this error came from request cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::FetchError(e) if e.is_cancelled())
    }

    /// Whether this error is an external fetch failure (store error or timeout).
    /// Cancellation is not counted.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::FetchError(e) if !e.is_cancelled())
    }
}

/// Convenience alias used throughout the workspace.
pub type ShelfResult<T> = Result<T, ShelfError>;
