//! News Topics Daemon
//!
//! Clusters recently ingested news articles into topics and reconciles
//! them against the rolling topic set, either once or on a schedule.
//!
//! # Usage
//!
//! ```bash
//! news-topicsd run
//! news-topicsd start [--run-on-startup]
//! news-topicsd seed --file articles.json
//! news-topicsd topics [--days N]
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/news-topics/config.toml)
//! 3. Environment variables (NEWS_TOPICS_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use topics_daemon::{
    init_logging, list_topics, run_once, seed, start_daemon, Cli, Commands, Settings,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }
    if let Some(db_path) = cli.db_path {
        settings.db_path = db_path;
    }

    init_logging(&settings.log_level)?;

    match cli.command {
        Commands::Run => {
            run_once(&settings).await?;
        }
        Commands::Start { run_on_startup } => {
            start_daemon(&settings, run_on_startup).await?;
        }
        Commands::Seed { file } => {
            seed(&settings, &file)?;
        }
        Commands::Topics { days } => {
            list_topics(&settings, days)?;
        }
    }

    Ok(())
}
