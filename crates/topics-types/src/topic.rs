//! Topic data types.
//!
//! A [`Topic`] is the persistent entity: a cross-run identity for a
//! recurring subject, distinguished from the transient per-run cluster it
//! was derived from. Field names serialize camelCase to match the stored
//! topic documents.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::document::ArticleRef;

/// Document type discriminator stored on every topic record.
pub const DAILY_TOPIC_TYPE: &str = "daily_topic";

fn default_doc_type() -> String {
    DAILY_TOPIC_TYPE.to_string()
}

/// A persistent topic record.
///
/// `id` and `first_seen` are fixed at creation and must survive every
/// later update. `total_articles_seen` only ever grows. Everything else
/// reflects the most recent run that matched this topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Stable identifier, minted on the run that created the topic
    pub id: String,

    /// Partition key; equals `first_seen` formatted as a date
    pub partition_key: String,

    /// Always [`DAILY_TOPIC_TYPE`]
    #[serde(rename = "type", default = "default_doc_type")]
    pub doc_type: String,

    /// Date of the most recent run that touched this topic
    pub date: NaiveDate,

    /// Short human-readable name, minted once via the labeling gateway
    pub topic_name: String,

    /// Coarse category; may be absent on topics created before
    /// categorization existed
    #[serde(default)]
    pub category: Option<String>,

    /// Member article count of the current run's cluster
    pub article_count: u64,

    /// Cumulative article count across all runs that matched this topic
    pub total_articles_seen: u64,

    /// Per-source article tallies for the current run
    pub sources: BTreeMap<String, u64>,

    /// Current run's member articles; replaced each run, never appended
    pub articles: Vec<ArticleRef>,

    /// First 5 distinct non-empty member titles of the current cluster
    pub representative_titles: Vec<String>,

    /// Element-wise mean of the current cluster's member embeddings
    pub centroid: Vec<f32>,

    /// Date the topic was first created; immutable
    pub first_seen: NaiveDate,

    /// Timestamp of the run that produced this revision
    pub last_updated: DateTime<Utc>,
}

impl Topic {
    /// True when this revision was the topic's creation run.
    pub fn is_new(&self) -> bool {
        self.total_articles_seen == self.article_count
    }
}

/// The projection of a stored topic that matching consumes.
///
/// This is what the active-topic fetch returns: enough to compare
/// centroids and to carry identity forward, nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTopic {
    /// Stable topic identifier
    pub id: String,

    /// Short name, preserved verbatim on a match
    pub topic_name: String,

    /// Stored centroid from the topic's latest revision
    pub centroid: Vec<f32>,

    /// Article count of the latest revision
    pub article_count: u64,

    /// Creation date, preserved verbatim on a match
    pub first_seen: NaiveDate,

    /// Cumulative article count, incremented on a match
    pub total_articles_seen: u64,

    /// Coarse category, when the stored topic has one
    #[serde(default)]
    pub category: Option<String>,
}

impl From<&Topic> for ActiveTopic {
    fn from(topic: &Topic) -> Self {
        Self {
            id: topic.id.clone(),
            topic_name: topic.topic_name.clone(),
            centroid: topic.centroid.clone(),
            article_count: topic.article_count,
            first_seen: topic.first_seen,
            total_articles_seen: topic.total_articles_seen,
            category: topic.category.clone(),
        }
    }
}
