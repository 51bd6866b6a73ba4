//! Shared test harness for end-to-end tests.
//!
//! Wires a real RocksDB store (in a temp directory) to the analyzer with
//! a mock labeling gateway, so tests exercise the full fetch → cluster →
//! reconcile → persist path.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use topics_engine::{AnalyzerConfig, DocumentSource, TopicAnalyzer, TopicStore};
use topics_labeling::MockLabeler;
use topics_store::Storage;
use topics_types::Document;

/// A temp-dir backed store plus everything needed to run the analyzer.
pub struct TestHarness {
    /// The store under test
    pub storage: Arc<Storage>,
    /// The mock gateway, kept around for call-count assertions
    pub labeler: Arc<MockLabeler>,
    _tempdir: TempDir,
}

impl TestHarness {
    /// Create a harness with a default mock labeler.
    pub fn new() -> Self {
        Self::with_labeler(MockLabeler::with_responses("Test Topic", "TestCategory"))
    }

    /// Create a harness with a specific mock labeler.
    pub fn with_labeler(labeler: MockLabeler) -> Self {
        let tempdir = TempDir::new().expect("Failed to create temp dir");
        let storage = Arc::new(Storage::open(tempdir.path()).expect("Failed to open storage"));
        Self {
            storage,
            labeler: Arc::new(labeler),
            _tempdir: tempdir,
        }
    }

    /// Build an analyzer over this harness's store and labeler.
    pub fn analyzer(&self) -> TopicAnalyzer {
        let documents: Arc<dyn DocumentSource> = self.storage.clone();
        let topics: Arc<dyn TopicStore> = self.storage.clone();
        TopicAnalyzer::new(
            documents,
            topics,
            self.labeler.clone(),
            AnalyzerConfig::default(),
        )
    }

    /// Seed one article published `hours_ago` hours ago.
    pub fn seed_article(
        &self,
        id: &str,
        title: &str,
        source_id: &str,
        embedding: Vec<f32>,
        hours_ago: i64,
    ) {
        let article = Document::new(
            id.to_string(),
            title.to_string(),
            source_id.to_string(),
            Utc::now() - Duration::hours(hours_ago),
            Some(format!("https://example.com/{}", id)),
            embedding,
        );
        self.storage
            .put_article(&article)
            .expect("Failed to seed article");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
