mod cli;
mod commands;
mod tracing_setup;

use anyhow::Context;
use clap::Parser;

use shelf_core::ShelfConfig;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ShelfConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ShelfConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.storage.db_path = db.to_string_lossy().into_owned();
    }

    tracing_setup::init_tracing(&config.observability);

    match cli.command {
        Commands::Import { path } => commands::import::run(&config, &path, cli.json).await,
        Commands::Recommend { user, limit } => {
            commands::recommend::run(&config, user, limit, cli.json).await
        }
        Commands::Similar {
            review,
            user,
            limit,
        } => commands::similar::run(&config, review, user, limit, cli.json).await,
    }
}
