// Single source of truth for all default values.

// --- Recommendation ---
pub const DEFAULT_FEED_LIMIT: usize = 30;
pub const DEFAULT_DECAY_BASE: f64 = 2.0;
pub const DEFAULT_VIEWED_LIMIT: usize = 15;
pub const DEFAULT_FOLLOWED_LIMIT: usize = 5;
pub const DEFAULT_LIKED_LIMIT: usize = 8;
pub const DEFAULT_OWN_REVIEWS_LIMIT: usize = 5;
pub const DEFAULT_FALLBACK_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_FALLBACK_WHEN_EMPTY: bool = true;
pub const DEFAULT_EXCLUDE_SEEN: bool = true;
pub const DEFAULT_EXCLUDE_OWN_REVIEWS: bool = true;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 2_000;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;
pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_EMBEDDING_CACHE_TTL_SECS: u64 = 3_600; // 1 hour

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "shelf.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_ACTIVITY_HISTORY_LIMIT: usize = 50;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
