use std::path::Path;

use anyhow::Context;
use tracing::info;

use shelf_core::ShelfConfig;
use shelf_storage::{Dataset, SqliteStore};

use super::print_json;

pub async fn run(config: &ShelfConfig, path: &Path, json: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let dataset = Dataset::from_json(&raw)
        .with_context(|| format!("invalid dataset {}", path.display()))?;

    let db = Path::new(&config.storage.db_path);
    let store = SqliteStore::open(db, &config.storage, config.embedding.dimensions)
        .with_context(|| format!("failed to open database {}", db.display()))?;
    let summary = store.import(&dataset).await.context("import failed")?;
    info!(reviews = summary.reviews, users = summary.users, "dataset imported");

    if json {
        return print_json(&summary);
    }
    println!("Imported into {}:", db.display());
    println!("  users        {}", summary.users);
    println!("  reviews      {}", summary.reviews);
    println!("  embeddings   {}", summary.embeddings);
    println!("  views        {}", summary.views);
    println!("  likes        {}", summary.likes);
    println!("  follows      {}", summary.follows);
    println!("  blocks       {}", summary.blocks);
    println!("  muted books  {}", summary.muted_books);
    Ok(())
}
