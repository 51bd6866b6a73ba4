//! Scheduled trigger for the news-topics analyzer.
//!
//! This crate provides async job scheduling using `tokio-cron-scheduler`
//! with timezone support and graceful shutdown capabilities. The analyzer
//! runs on a fixed cadence; the service detects and logs late fires but
//! never modifies a run because of one.
//!
//! # Example
//!
//! ```ignore
//! use topics_scheduler::{SchedulerService, SchedulerConfig};
//!
//! let config = SchedulerConfig::default();
//! let scheduler = SchedulerService::new(config).await?;
//!
//! scheduler.add_cron_job(
//!     "topic-analyzer",
//!     "1 0,15,30,45 * * * *",
//!     None,               // Use default timezone
//!     Some(900),          // Expected cadence for late-fire warnings
//!     |_token| async { run_analyzer().await },
//! ).await?;
//!
//! scheduler.start().await?;
//! ```

mod config;
mod error;
mod scheduler;

pub use config::SchedulerConfig;
pub use error::SchedulerError;
pub use scheduler::{validate_cron_expression, SchedulerService};
