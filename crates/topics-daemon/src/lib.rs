//! News-topics daemon library exports.
//!
//! This crate provides the CLI daemon binary for the news-topics system.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (run, start, seed, topics)
//! - `settings`: Layered configuration loading

pub mod cli;
pub mod commands;
pub mod settings;

pub use cli::{Cli, Commands};
pub use commands::{init_logging, list_topics, run_once, seed, start_daemon};
pub use settings::{LabelingSettings, Settings};
