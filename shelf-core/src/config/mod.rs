pub mod defaults;
mod embedding_config;
mod observability_config;
mod recommend_config;
mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use embedding_config::EmbeddingConfig;
pub use observability_config::ObservabilityConfig;
pub use recommend_config::{CategoryLimits, FailurePolicy, RecommendConfig};
pub use storage_config::StorageConfig;

use crate::constants::MAX_ACTIVITY_HISTORY;
use crate::errors::{ShelfError, ShelfResult};

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub recommend: RecommendConfig,
    pub embedding: EmbeddingConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl ShelfConfig {
    /// Parse a TOML string. Missing sections and fields use defaults.
    pub fn from_toml(s: &str) -> ShelfResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ShelfError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> ShelfResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ShelfError::ConfigError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&raw)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> ShelfResult<()> {
        let base = self.recommend.decay_base;
        if !base.is_finite() || base <= 0.0 {
            return Err(ShelfError::ConfigError(format!(
                "recommend.decay_base must be finite and > 0, got {base}"
            )));
        }
        if self.embedding.dimensions == 0 {
            return Err(ShelfError::ConfigError(
                "embedding.dimensions must be > 0".to_string(),
            ));
        }
        if self.recommend.fallback_window_days < 0 {
            return Err(ShelfError::ConfigError(format!(
                "recommend.fallback_window_days must be >= 0, got {}",
                self.recommend.fallback_window_days
            )));
        }
        let history = self.storage.activity_history_limit;
        if history == 0 || history > MAX_ACTIVITY_HISTORY {
            return Err(ShelfError::ConfigError(format!(
                "storage.activity_history_limit must be in 1..={MAX_ACTIVITY_HISTORY}, got {history}"
            )));
        }
        Ok(())
    }
}
