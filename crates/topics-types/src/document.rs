//! Article document types.
//!
//! A [`Document`] is one fetched news article: metadata plus the raw
//! embedding value as it came out of the article store. Documents are
//! immutable once fetched and owned by the run that fetched them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news article with its embedding, as fetched from the article store.
///
/// The embedding is kept as a raw JSON value here; coercion into a flat
/// numeric vector is the validator's job, so one malformed article cannot
/// fail the whole fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique article identifier
    pub id: String,

    /// Article headline
    pub title: String,

    /// Identifier of the feed/outlet the article came from
    pub source_id: String,

    /// Publication timestamp (source time, not ingestion time)
    pub published_at: DateTime<Utc>,

    /// Canonical article URL, when the feed provided one
    #[serde(default)]
    pub url: Option<String>,

    /// Raw embedding value; expected to be a flat JSON array of numbers
    pub embedding: serde_json::Value,
}

impl Document {
    /// Create a document with an already well-formed embedding vector.
    pub fn new(
        id: String,
        title: String,
        source_id: String,
        published_at: DateTime<Utc>,
        url: Option<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id,
            title,
            source_id,
            published_at,
            url,
            embedding: serde_json::json!(embedding),
        }
    }
}

/// Per-run article listing embedded in a topic document.
///
/// Replaced wholesale on every run that touches the topic; only the
/// counters on the topic itself accumulate history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRef {
    /// Article headline
    pub title: String,

    /// Feed/outlet identifier
    pub source_id: String,

    /// Canonical URL, when known
    #[serde(default)]
    pub url: Option<String>,
}

impl ArticleRef {
    /// Build the reference entry for one article.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            title: doc.title.clone(),
            source_id: doc.source_id.clone(),
            url: doc.url.clone(),
        }
    }
}
