//! RocksDB wrapper for article and topic documents.
//!
//! Values are serde_json documents in the same wire shape the rest of
//! the system speaks; keys are laid out so the two access patterns the
//! analyzer needs (articles by window, topics whole) are single scans.

use std::path::Path;

use chrono::NaiveDate;
use rocksdb::{Direction, IteratorMode, Options, DB};
use tracing::{debug, info, instrument};

use topics_types::{ActiveTopic, Document, Topic, DAILY_TOPIC_TYPE};

use crate::column_families::{build_cf_descriptors, CF_ARTICLES, CF_TOPICS};
use crate::error::StoreError;
use crate::keys::{topic_key, ArticleKey};

/// RocksDB-backed storage for articles and topics.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open storage at the given path, creating it if necessary.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!("Opening storage at {:?}", path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors = build_cf_descriptors();
        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        Ok(Self { db })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::ColumnFamilyNotFound(name.to_string()))
    }

    // --- Articles ---

    /// Store one article, keyed by publication time.
    #[instrument(skip(self, article), fields(article_id = %article.id))]
    pub fn put_article(&self, article: &Document) -> Result<(), StoreError> {
        let cf = self.cf(CF_ARTICLES)?;
        let key = ArticleKey::new(article.published_at.timestamp_millis(), &article.id);
        let value = serde_json::to_vec(article)?;
        self.db.put_cf(&cf, key.to_bytes(), value)?;
        debug!("Stored article");
        Ok(())
    }

    /// All articles published at or after `start_ms`, in publication
    /// order.
    pub fn articles_since(&self, start_ms: i64) -> Result<Vec<Document>, StoreError> {
        let cf = self.cf(CF_ARTICLES)?;
        let start = ArticleKey::prefix_start(start_ms);

        let mut articles = Vec::new();
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&start, Direction::Forward));
        for item in iter {
            let (_, value) = item?;
            let article: Document = serde_json::from_slice(&value)?;
            articles.push(article);
        }
        Ok(articles)
    }

    // --- Topics ---

    /// Insert or replace one topic, keyed by its id.
    #[instrument(skip(self, topic), fields(topic_id = %topic.id))]
    pub fn put_topic(&self, topic: &Topic) -> Result<(), StoreError> {
        let cf = self.cf(CF_TOPICS)?;
        let value = serde_json::to_vec(topic)?;
        self.db.put_cf(&cf, topic_key(&topic.id), value)?;
        debug!("Stored topic");
        Ok(())
    }

    /// Fetch one topic by id.
    pub fn get_topic(&self, topic_id: &str) -> Result<Option<Topic>, StoreError> {
        let cf = self.cf(CF_TOPICS)?;
        match self.db.get_cf(&cf, topic_key(topic_id))? {
            Some(bytes) => {
                let topic: Topic = serde_json::from_slice(&bytes)?;
                Ok(Some(topic))
            }
            None => Ok(None),
        }
    }

    /// All stored topics, in key order.
    pub fn list_topics(&self) -> Result<Vec<Topic>, StoreError> {
        let cf = self.cf(CF_TOPICS)?;
        let mut topics = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item?;
            let topic: Topic = serde_json::from_slice(&value)?;
            topics.push(topic);
        }
        Ok(topics)
    }

    /// Topics touched on or after `cutoff`, projected for matching.
    pub fn active_topics(&self, cutoff: NaiveDate) -> Result<Vec<ActiveTopic>, StoreError> {
        let topics = self.list_topics()?;
        Ok(topics
            .iter()
            .filter(|t| t.doc_type == DAILY_TOPIC_TYPE && t.date >= cutoff)
            .map(ActiveTopic::from)
            .collect())
    }
}
