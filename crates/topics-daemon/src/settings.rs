//! Daemon configuration.
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/news-topics/config.toml)
//! 3. Environment variables (NEWS_TOPICS_*)
//! 4. CLI flags

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use topics_engine::AnalyzerConfig;
use topics_scheduler::SchedulerConfig;

/// Daemon settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// RocksDB directory
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Analyzer parameters
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Trigger parameters
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Labeling gateway parameters
    #[serde(default)]
    pub labeling: LabelingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: default_log_level(),
            analyzer: AnalyzerConfig::default(),
            scheduler: SchedulerConfig::default(),
            labeling: LabelingSettings::default(),
        }
    }
}

/// Labeling gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelingSettings {
    /// API key; absent means topics get placeholder names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat-completions model
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for LabelingSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

fn default_db_path() -> String {
    directories::ProjectDirs::from("", "", "news-topics")
        .map(|dirs| dirs.data_dir().join("db").to_string_lossy().into_owned())
        .unwrap_or_else(|| "./news-topics-db".to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "news-topics")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Settings {
    /// Load settings from defaults, an optional TOML file, and
    /// `NEWS_TOPICS_*` environment variables.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        let file_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => default_config_path(),
        };
        if let Some(path) = file_path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("NEWS_TOPICS").separator("__"),
        );

        let settings = builder
            .build()
            .context("Failed to assemble configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(settings)
    }

    /// Database path as a filesystem path.
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.db_path)
    }
}
