//! # topics-labeling
//!
//! Labeling gateway for the news-topics system.
//!
//! A newly discovered topic needs a short human-readable name and a coarse
//! category; both come from an external text-generation backend. The
//! gateway contract is narrow: hand over at most a handful of headlines,
//! get a non-empty string back. When the backend is unreachable,
//! misconfigured, or returns nothing, the deterministic fallback strings
//! are substituted so a run never stalls on labeling.

mod api;
mod mock;

pub use api::{ApiLabeler, ApiLabelerConfig};
pub use mock::MockLabeler;

use async_trait::async_trait;
use thiserror::Error;

/// Placeholder name for topics the backend could not label.
pub const FALLBACK_LABEL: &str = "Untitled topic";

/// Placeholder category for topics the backend could not categorize.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

/// Error type for labeling operations.
#[derive(Debug, Error)]
pub enum LabelerError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Pluggable topic labeling gateway.
///
/// Implementations must be deterministic about failure: a caller passing
/// the same titles to a backend that stays down gets the same fallback
/// string every time.
#[async_trait]
pub trait TopicLabeler: Send + Sync {
    /// Generate a short topic name (a few words) from representative
    /// headlines. At most 5 titles are passed.
    async fn label_topic(&self, titles: &[String]) -> Result<String, LabelerError>;

    /// Generate a single-word coarse category from representative
    /// headlines. At most 5 titles are passed.
    async fn categorize_topic(&self, titles: &[String]) -> Result<String, LabelerError>;
}
