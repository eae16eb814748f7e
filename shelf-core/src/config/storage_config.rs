use serde::{Deserialize, Serialize};

use super::defaults;

/// Storage configuration for the SQLite reference store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub read_pool_size: usize,
    pub busy_timeout_ms: u32,
    /// Most recent distinct reviews read per activity category.
    pub activity_history_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: defaults::DEFAULT_DB_FILENAME.to_string(),
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
            activity_history_limit: defaults::DEFAULT_ACTIVITY_HISTORY_LIMIT,
        }
    }
}
