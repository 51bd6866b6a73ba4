//! Engine error types.

use thiserror::Error;

/// Errors that can occur during an analyzer run.
///
/// Only `DataSource` is abort-class: it propagates out of
/// [`crate::TopicAnalyzer::run`] so the trigger layer can alert and retry.
/// The other variants are signals between core components that the
/// analyzer resolves within the run (skip a cluster, fall back, continue).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Document or active-topic fetch failed; the run cannot proceed
    #[error("Data source unavailable: {0}")]
    DataSource(String),

    /// Centroid requested for a cluster with zero members
    #[error("Cannot compute centroid of an empty cluster")]
    EmptyCluster,

    /// A centroid with zero norm cannot be normalized for matching
    #[error("Degenerate centroid: zero norm")]
    DegenerateCentroid,
}
