//! Collaborator contracts for the analyzer.
//!
//! The engine never talks to a backend directly; it is handed a document
//! source and a topic store at construction time, so storage technology
//! stays behind these traits and tests can inject doubles.

use async_trait::async_trait;
use thiserror::Error;

use topics_types::{ActiveTopic, Document, Topic};

/// Error type for collaborator operations.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backend could not be reached or the operation failed outright
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be decoded
    #[error("Malformed record: {0}")]
    Malformed(String),
}

/// Provides the articles that arrived within a recent window.
///
/// An empty result is valid and means "nothing to do"; it must not be
/// reported as an error.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch every article published within the last `window_hours`.
    async fn fetch_window(&self, window_hours: u32) -> Result<Vec<Document>, SourceError>;
}

/// Reads active topics and persists topic revisions.
#[async_trait]
pub trait TopicStore: Send + Sync {
    /// Fetch topics touched within the last `window_days`. An empty
    /// result is valid and means "no existing topics".
    async fn fetch_active(&self, window_days: u32) -> Result<Vec<ActiveTopic>, SourceError>;

    /// Insert or replace a topic, keyed by its `id`. Re-upserting the
    /// same id with identical content must be observably a no-op.
    async fn upsert(&self, topic: &Topic) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Unavailable("connection reset".to_string());
        assert!(err.to_string().contains("Backend unavailable"));

        let err = SourceError::Malformed("truncated JSON".to_string());
        assert!(err.to_string().contains("Malformed record"));
    }
}
