//! # topics-engine
//!
//! Clustering-and-reconciliation core of the news-topics system.
//!
//! One run turns a window of embedded articles into topic revisions:
//! - validate raw embeddings into uniform flat vectors
//! - group them with density-based clustering (DBSCAN)
//! - derive one mean centroid per cluster
//! - decide per cluster whether it continues a known topic (cosine
//!   similarity against the active set) or starts a new one
//! - merge counters and provenance into a topic revision and persist it
//!
//! Storage and labeling backends stay behind the [`sources`] and
//! `topics_labeling` traits; the analyzer is handed its collaborators
//! and never constructs them.

pub mod analyzer;
pub mod cluster;
pub mod config;
pub mod error;
pub mod matcher;
pub mod reconciler;
pub mod similarity;
pub mod sources;
pub mod validator;

pub use analyzer::{RunSummary, TopicAnalyzer};
pub use cluster::{dbscan, ClusterParams, NOISE};
pub use config::AnalyzerConfig;
pub use error::EngineError;
pub use matcher::find_matching_topic;
pub use reconciler::{ClusterSummary, TopicReconciler};
pub use similarity::{centroid, cosine_similarity, normalize};
pub use sources::{DocumentSource, SourceError, TopicStore};
pub use validator::{validate_batch, BatchValidation, ValidatedDocument};
