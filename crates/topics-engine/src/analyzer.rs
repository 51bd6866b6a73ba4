//! The analyzer run: fetch, cluster, reconcile, persist.
//!
//! One invocation is a single-threaded, single-pass batch job. The only
//! state that survives between invocations is whatever the topic store
//! persists; nothing is cached in the analyzer itself.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use topics_labeling::TopicLabeler;
use topics_types::Topic;

use crate::cluster::{dbscan, ClusterParams, NOISE};
use crate::config::AnalyzerConfig;
use crate::error::EngineError;
use crate::matcher::find_matching_topic;
use crate::reconciler::{ClusterSummary, TopicReconciler};
use crate::similarity::centroid;
use crate::sources::{DocumentSource, TopicStore};
use crate::validator::{validate_batch, BatchValidation};

/// Outcome counters for one analyzer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Articles fetched from the window
    pub articles_loaded: usize,
    /// Non-noise clusters formed
    pub clusters_formed: usize,
    /// Topics created this run
    pub topics_created: usize,
    /// Existing topics updated this run
    pub topics_updated: usize,
    /// Topic revisions successfully persisted
    pub topics_saved: usize,
    /// Topic revisions that failed to persist and were skipped
    pub topics_failed: usize,
}

/// Sequences one clustering-and-reconciliation pass.
///
/// Collaborators are injected; their lifecycle belongs to the caller.
pub struct TopicAnalyzer {
    documents: Arc<dyn DocumentSource>,
    topics: Arc<dyn TopicStore>,
    labeler: Arc<dyn TopicLabeler>,
    config: AnalyzerConfig,
}

impl TopicAnalyzer {
    /// Create an analyzer over the given collaborators.
    pub fn new(
        documents: Arc<dyn DocumentSource>,
        topics: Arc<dyn TopicStore>,
        labeler: Arc<dyn TopicLabeler>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            documents,
            topics,
            labeler,
            config,
        }
    }

    /// Run one pass at the current wall-clock time.
    ///
    /// # Errors
    /// `DataSource` when the article or active-topic fetch fails; every
    /// other failure kind is resolved within the run.
    pub async fn run(&self) -> Result<RunSummary, EngineError> {
        self.run_at(Utc::now()).await
    }

    /// Run one pass as-of `now`. Split out so tests can pin the run
    /// date.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunSummary, EngineError> {
        info!("Topic analyzer run started");
        let mut summary = RunSummary::default();

        let documents = self
            .documents
            .fetch_window(self.config.window_hours)
            .await
            .map_err(|e| EngineError::DataSource(e.to_string()))?;

        if documents.is_empty() {
            info!(
                window_hours = self.config.window_hours,
                "No articles in window, skipping clustering"
            );
            return Ok(summary);
        }
        summary.articles_loaded = documents.len();
        info!(count = documents.len(), "Loaded articles");

        let active_topics = self
            .topics
            .fetch_active(self.config.active_window_days)
            .await
            .map_err(|e| EngineError::DataSource(e.to_string()))?;
        info!(count = active_topics.len(), "Fetched active topics");

        let batch = validate_batch(documents);

        let assignments = if batch.is_uniform() {
            self.assign_clusters(&batch)
        } else {
            error!(
                dimensions = ?batch.dimensions(),
                "Inconsistent embedding dimensions, treating every article as noise"
            );
            vec![NOISE; batch.documents.len()]
        };

        let date = now.date_naive();
        let reconciler = TopicReconciler::new(&*self.labeler, self.config.representative_titles);

        let cluster_ids: BTreeSet<i64> = assignments
            .iter()
            .copied()
            .filter(|&id| id != NOISE)
            .collect();
        summary.clusters_formed = cluster_ids.len();

        for cluster_id in cluster_ids {
            let member_vectors: Vec<&[f32]> = batch
                .documents
                .iter()
                .zip(assignments.iter())
                .filter(|(_, &label)| label == cluster_id)
                .filter_map(|(doc, _)| doc.vector.as_deref())
                .collect();
            let members: Vec<_> = batch
                .documents
                .iter()
                .zip(assignments.iter())
                .filter(|(_, &label)| label == cluster_id)
                .map(|(doc, _)| &doc.document)
                .collect();

            let cluster_centroid = match centroid(&member_vectors) {
                Ok(mean) => mean,
                Err(e) => {
                    error!(cluster = cluster_id, error = %e, "Skipping cluster");
                    continue;
                }
            };

            let matched = match find_matching_topic(
                &cluster_centroid,
                &active_topics,
                self.config.match_threshold,
            ) {
                Ok(matched) => matched,
                Err(EngineError::DegenerateCentroid) => {
                    warn!(
                        cluster = cluster_id,
                        "Cluster centroid has zero norm, treating as unmatched"
                    );
                    None
                }
                Err(e) => return Err(e),
            };

            let cluster_summary = ClusterSummary {
                cluster_id,
                members,
                centroid: cluster_centroid,
            };
            let topic = reconciler
                .reconcile(&cluster_summary, matched, date, now)
                .await;

            if topic.is_new() {
                summary.topics_created += 1;
            } else {
                summary.topics_updated += 1;
            }

            self.persist(&topic, &mut summary).await;
        }

        info!(
            new = summary.topics_created,
            updated = summary.topics_updated,
            saved = summary.topics_saved,
            failed = summary.topics_failed,
            "Topic analyzer run finished"
        );
        Ok(summary)
    }

    /// Cluster usable vectors and scatter the labels back over the full
    /// batch, pinning unusable documents to noise.
    fn assign_clusters(&self, batch: &BatchValidation) -> Vec<i64> {
        let vectors: Vec<Vec<f32>> = batch
            .documents
            .iter()
            .filter_map(|doc| doc.vector.clone())
            .collect();

        let params = ClusterParams {
            eps: self.config.eps,
            min_points: self.config.min_points,
        };
        let labels = dbscan(&vectors, &params);

        let mut label_iter = labels.into_iter();
        batch
            .documents
            .iter()
            .map(|doc| {
                if doc.usable() {
                    label_iter.next().unwrap_or(NOISE)
                } else {
                    NOISE
                }
            })
            .collect()
    }

    /// Upsert one topic revision; a failure is logged and skipped so the
    /// rest of the run's topics still get saved.
    async fn persist(&self, topic: &Topic, summary: &mut RunSummary) {
        match self.topics.upsert(topic).await {
            Ok(()) => summary.topics_saved += 1,
            Err(e) => {
                error!(topic_id = %topic.id, error = %e, "Failed to save topic, skipping");
                summary.topics_failed += 1;
            }
        }
    }
}
