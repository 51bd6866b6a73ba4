//! CLI argument parsing for the news-topics daemon.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// News Topics Daemon
///
/// Clusters recently ingested news articles into topics on a fixed
/// schedule and reconciles them against the rolling topic set.
#[derive(Parser, Debug)]
#[command(name = "news-topicsd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/news-topics/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override database path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Daemon commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute one analyzer pass immediately and exit
    Run,

    /// Start the scheduled daemon
    Start {
        /// Run one analyzer pass immediately, before the first
        /// scheduled fire
        #[arg(long)]
        run_on_startup: bool,
    },

    /// Load articles from a JSON file into the store
    Seed {
        /// Path to a JSON array of article documents
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List stored topics
    Topics {
        /// Only topics from the last N days
        #[arg(short, long, default_value = "7")]
        days: u32,
    },
}
