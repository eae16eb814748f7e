use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(version)]
#[command(about = "Book-review recommendations from reading activity", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML config file (defaults apply for anything missing)
    #[arg(short, long, global = true, env = "SHELF_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database path, overrides storage.db_path
    #[arg(long, global = true, env = "SHELF_DB")]
    pub db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed the database from a JSON dataset
    Import {
        /// Dataset file
        #[arg(required = true)]
        path: PathBuf,
    },

    /// Build the personalized feed for a user (anonymous if omitted)
    Recommend {
        #[arg(short, long)]
        user: Option<i64>,

        /// Feed size (default: recommend.feed_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Reviews similar to a given review
    Similar {
        #[arg(short, long)]
        review: i64,

        /// Viewer whose blocks and mutes apply
        #[arg(short, long)]
        user: Option<i64>,

        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}
