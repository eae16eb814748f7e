pub mod import;
pub mod recommend;
pub mod similar;

use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use shelf_aggregation::{CancelToken, RequestContext};
use shelf_core::ShelfConfig;
use shelf_storage::{CachedEmbeddingStore, SqliteStore};

/// Open the configured database behind the embedding cache.
pub fn open_store(config: &ShelfConfig) -> anyhow::Result<CachedEmbeddingStore<SqliteStore>> {
    let path = Path::new(&config.storage.db_path);
    let store = SqliteStore::open(path, &config.storage, config.embedding.dimensions)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    Ok(CachedEmbeddingStore::new(store, &config.embedding))
}

/// A request context that Ctrl-C cancels.
pub fn request_context(config: &ShelfConfig) -> RequestContext {
    let token = CancelToken::new();
    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling request");
            on_signal.cancel();
        }
    });

    RequestContext::new()
        .with_cancel_token(token)
        .with_fetch_timeout(config.recommend.fetch_timeout_ms.map(Duration::from_millis))
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}
