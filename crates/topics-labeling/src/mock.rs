//! Mock labeler for testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{LabelerError, TopicLabeler};

/// Mock labeler that returns canned responses and counts calls.
///
/// Useful for testing reconciliation without making API calls; the call
/// counters let tests assert how many gateway round-trips a run made.
pub struct MockLabeler {
    label: String,
    category: String,
    fail: bool,
    label_calls: AtomicUsize,
    category_calls: AtomicUsize,
}

impl MockLabeler {
    /// Create a mock returning default canned responses.
    pub fn new() -> Self {
        Self::with_responses("Mock Topic", "MockCategory")
    }

    /// Create a mock with specific canned responses.
    pub fn with_responses(label: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            category: category.into(),
            fail: false,
            label_calls: AtomicUsize::new(0),
            category_calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock whose every call fails.
    pub fn failing() -> Self {
        Self {
            label: String::new(),
            category: String::new(),
            fail: true,
            label_calls: AtomicUsize::new(0),
            category_calls: AtomicUsize::new(0),
        }
    }

    /// Number of `label_topic` calls made so far.
    pub fn label_calls(&self) -> usize {
        self.label_calls.load(Ordering::SeqCst)
    }

    /// Number of `categorize_topic` calls made so far.
    pub fn category_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockLabeler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TopicLabeler for MockLabeler {
    async fn label_topic(&self, _titles: &[String]) -> Result<String, LabelerError> {
        self.label_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LabelerError::ApiError("mock failure".to_string()));
        }
        Ok(self.label.clone())
    }

    async fn categorize_topic(&self, _titles: &[String]) -> Result<String, LabelerError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LabelerError::ApiError("mock failure".to_string()));
        }
        Ok(self.category.clone())
    }
}
