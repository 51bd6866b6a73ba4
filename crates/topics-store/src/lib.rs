//! # topics-store
//!
//! RocksDB-backed persistence for the news-topics system.
//!
//! Provides:
//! - Column family isolation for articles and topics
//! - Time-prefixed article keys for efficient window scans
//! - serde_json document values in the shared wire shape
//! - Implementations of the engine's `DocumentSource` and `TopicStore`
//!   collaborator traits

pub mod column_families;
pub mod db;
pub mod error;
pub mod keys;

pub use db::Storage;
pub use error::StoreError;
pub use keys::ArticleKey;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use topics_engine::{DocumentSource, SourceError, TopicStore};
use topics_types::{ActiveTopic, Document, Topic};

#[async_trait]
impl DocumentSource for Storage {
    async fn fetch_window(&self, window_hours: u32) -> Result<Vec<Document>, SourceError> {
        let start = Utc::now() - Duration::hours(i64::from(window_hours));
        Ok(self.articles_since(start.timestamp_millis())?)
    }
}

#[async_trait]
impl TopicStore for Storage {
    async fn fetch_active(&self, window_days: u32) -> Result<Vec<ActiveTopic>, SourceError> {
        let cutoff = Utc::now().date_naive() - Duration::days(i64::from(window_days));
        Ok(self.active_topics(cutoff)?)
    }

    async fn upsert(&self, topic: &Topic) -> Result<(), SourceError> {
        Ok(self.put_topic(topic)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_storage() -> (Storage, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        (storage, dir)
    }

    #[tokio::test]
    async fn test_fetch_window_returns_recent_articles() {
        let (storage, _dir) = open_storage();
        let article = Document::new(
            "a1".to_string(),
            "Recent headline".to_string(),
            "wire-a".to_string(),
            Utc::now() - Duration::hours(1),
            None,
            vec![1.0, 0.0],
        );
        storage.put_article(&article).unwrap();

        let fetched = storage.fetch_window(24).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, "a1");
    }

    #[tokio::test]
    async fn test_fetch_window_empty_store_is_empty_not_error() {
        let (storage, _dir) = open_storage();
        let fetched = storage.fetch_window(24).await.unwrap();
        assert!(fetched.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_active_empty_store_is_empty_not_error() {
        let (storage, _dir) = open_storage();
        let active = storage.fetch_active(7).await.unwrap();
        assert!(active.is_empty());
    }
}
