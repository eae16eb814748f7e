use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding configuration. Dimensions are fixed per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Dimensionality of every stored embedding.
    pub dimensions: usize,
    /// Max entries in the in-memory embedding cache. 0 disables the cache.
    pub cache_capacity: u64,
    /// Time-to-live for cached embeddings (seconds).
    pub cache_ttl_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            cache_capacity: defaults::DEFAULT_EMBEDDING_CACHE_CAPACITY,
            cache_ttl_secs: defaults::DEFAULT_EMBEDDING_CACHE_TTL_SECS,
        }
    }
}
