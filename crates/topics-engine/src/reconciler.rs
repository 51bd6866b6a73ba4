//! Reconciling clusters with the rolling topic set.
//!
//! Each non-noise cluster becomes one topic revision: either an update
//! of the matched topic, carrying its identity forward, or a brand-new
//! topic with a freshly minted name and category.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use topics_labeling::{TopicLabeler, FALLBACK_CATEGORY, FALLBACK_LABEL};
use topics_types::{ActiveTopic, ArticleRef, Document, Topic, DAILY_TOPIC_TYPE};

/// One non-noise cluster's run-scoped summary, ready for reconciliation.
#[derive(Debug)]
pub struct ClusterSummary<'a> {
    /// Cluster id as assigned by DBSCAN (non-negative)
    pub cluster_id: i64,

    /// Member documents, in input order
    pub members: Vec<&'a Document>,

    /// Element-wise mean of the member embeddings
    pub centroid: Vec<f32>,
}

/// Produces the topic revision for one cluster.
pub struct TopicReconciler<'a> {
    labeler: &'a dyn TopicLabeler,
    max_titles: usize,
}

impl<'a> TopicReconciler<'a> {
    /// Create a reconciler over the given labeling gateway.
    pub fn new(labeler: &'a dyn TopicLabeler, max_titles: usize) -> Self {
        Self { labeler, max_titles }
    }

    /// Build the topic revision for `cluster` given the matcher's
    /// decision.
    ///
    /// A match keeps the topic's identity (`id`, `topicName`,
    /// `firstSeen`) and increments the cumulative counter; everything
    /// else is replaced with this run's values. No match mints a new
    /// topic with an id deterministic per run date and cluster id, and
    /// asks the gateway for a name and a category. Labeling failures
    /// substitute the deterministic fallback strings.
    pub async fn reconcile(
        &self,
        cluster: &ClusterSummary<'_>,
        matched: Option<&ActiveTopic>,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Topic {
        let titles = self.representative_titles(&cluster.members);
        let articles: Vec<ArticleRef> = cluster
            .members
            .iter()
            .map(|doc| ArticleRef::from_document(doc))
            .collect();
        let sources = source_counts(&cluster.members);
        let article_count = cluster.members.len() as u64;

        match matched {
            Some(existing) => {
                let category = match &existing.category {
                    Some(category) => category.clone(),
                    None => self.category_or_fallback(&titles).await,
                };

                info!(
                    cluster = cluster.cluster_id,
                    topic_id = %existing.id,
                    topic_name = %existing.topic_name,
                    "Matched cluster to existing topic"
                );

                Topic {
                    id: existing.id.clone(),
                    partition_key: existing.first_seen.to_string(),
                    doc_type: DAILY_TOPIC_TYPE.to_string(),
                    date,
                    topic_name: existing.topic_name.clone(),
                    category: Some(category),
                    article_count,
                    total_articles_seen: existing.total_articles_seen + article_count,
                    sources,
                    articles,
                    representative_titles: titles,
                    centroid: cluster.centroid.clone(),
                    first_seen: existing.first_seen,
                    last_updated: now,
                }
            }
            None => {
                let topic_name = self.label_or_fallback(&titles).await;
                let category = self.category_or_fallback(&titles).await;

                info!(
                    cluster = cluster.cluster_id,
                    topic_name = %topic_name,
                    category = %category,
                    "New topic created"
                );

                Topic {
                    id: format!("{}-cluster-{}", date, cluster.cluster_id),
                    partition_key: date.to_string(),
                    doc_type: DAILY_TOPIC_TYPE.to_string(),
                    date,
                    topic_name,
                    category: Some(category),
                    article_count,
                    total_articles_seen: article_count,
                    sources,
                    articles,
                    representative_titles: titles,
                    centroid: cluster.centroid.clone(),
                    first_seen: date,
                    last_updated: now,
                }
            }
        }
    }

    /// First `max_titles` distinct non-empty member titles, in member
    /// order.
    fn representative_titles(&self, members: &[&Document]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut titles = Vec::new();
        for member in members {
            let title = member.title.trim();
            if title.is_empty() || !seen.insert(title.to_string()) {
                continue;
            }
            titles.push(title.to_string());
            if titles.len() == self.max_titles {
                break;
            }
        }
        titles
    }

    async fn label_or_fallback(&self, titles: &[String]) -> String {
        match self.labeler.label_topic(titles).await {
            Ok(label) if !label.trim().is_empty() => label,
            Ok(_) => {
                warn!("Labeling gateway returned an empty name, using fallback");
                FALLBACK_LABEL.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Labeling call failed, using fallback name");
                FALLBACK_LABEL.to_string()
            }
        }
    }

    async fn category_or_fallback(&self, titles: &[String]) -> String {
        match self.labeler.categorize_topic(titles).await {
            Ok(category) if !category.trim().is_empty() => category,
            Ok(_) => {
                warn!("Labeling gateway returned an empty category, using fallback");
                FALLBACK_CATEGORY.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Category call failed, using fallback category");
                FALLBACK_CATEGORY.to_string()
            }
        }
    }
}

fn source_counts(members: &[&Document]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for member in members {
        *counts.entry(member.source_id.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use topics_labeling::MockLabeler;

    fn doc(id: &str, title: &str, source_id: &str) -> Document {
        Document::new(
            id.to_string(),
            title.to_string(),
            source_id.to_string(),
            Utc::now(),
            Some(format!("https://example.com/{}", id)),
            vec![1.0, 1.0],
        )
    }

    fn cluster<'a>(members: Vec<&'a Document>) -> ClusterSummary<'a> {
        ClusterSummary {
            cluster_id: 0,
            members,
            centroid: vec![1.0, 1.0],
        }
    }

    fn matched_topic(category: Option<&str>) -> ActiveTopic {
        ActiveTopic {
            id: "2026-08-01-cluster-2".to_string(),
            topic_name: "Budget negotiations".to_string(),
            centroid: vec![0.9, 1.1],
            article_count: 5,
            first_seen: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            total_articles_seen: 12,
            category: category.map(|c| c.to_string()),
        }
    }

    fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    #[tokio::test]
    async fn test_new_topic_mints_id_and_labels() {
        let labeler = MockLabeler::with_responses("Budget vote", "Politics");
        let reconciler = TopicReconciler::new(&labeler, 5);

        let d1 = doc("a", "Parliament votes on budget", "wire-a");
        let d2 = doc("b", "Budget bill passes first reading", "wire-b");
        let d3 = doc("c", "Opposition splits over budget", "wire-a");
        let summary = cluster(vec![&d1, &d2, &d3]);

        let topic = reconciler
            .reconcile(&summary, None, run_date(), Utc::now())
            .await;

        assert_eq!(topic.id, "2026-08-06-cluster-0");
        assert_eq!(topic.partition_key, "2026-08-06");
        assert_eq!(topic.topic_name, "Budget vote");
        assert_eq!(topic.category.as_deref(), Some("Politics"));
        assert_eq!(topic.article_count, 3);
        assert_eq!(topic.total_articles_seen, 3);
        assert_eq!(topic.first_seen, run_date());
        assert_eq!(topic.sources.get("wire-a"), Some(&2));
        assert_eq!(topic.sources.get("wire-b"), Some(&1));
        // One name call, one category call
        assert_eq!(labeler.label_calls(), 1);
        assert_eq!(labeler.category_calls(), 1);
    }

    #[tokio::test]
    async fn test_match_preserves_identity_and_increments_counter() {
        let labeler = MockLabeler::new();
        let reconciler = TopicReconciler::new(&labeler, 5);

        let d1 = doc("a", "Budget talks resume", "wire-a");
        let d2 = doc("b", "New budget proposal unveiled", "wire-b");
        let summary = cluster(vec![&d1, &d2]);
        let existing = matched_topic(Some("Politics"));

        let topic = reconciler
            .reconcile(&summary, Some(&existing), run_date(), Utc::now())
            .await;

        assert_eq!(topic.id, existing.id);
        assert_eq!(topic.topic_name, existing.topic_name);
        assert_eq!(topic.first_seen, existing.first_seen);
        assert_eq!(topic.partition_key, "2026-08-01");
        assert_eq!(topic.article_count, 2);
        assert_eq!(topic.total_articles_seen, 14);
        assert_eq!(topic.date, run_date());
        assert_eq!(topic.category.as_deref(), Some("Politics"));
        // Existing category means zero gateway calls
        assert_eq!(labeler.label_calls(), 0);
        assert_eq!(labeler.category_calls(), 0);
    }

    #[tokio::test]
    async fn test_match_without_category_fetches_one() {
        let labeler = MockLabeler::with_responses("ignored", "Economy");
        let reconciler = TopicReconciler::new(&labeler, 5);

        let d1 = doc("a", "Markets rally", "wire-a");
        let summary = cluster(vec![&d1]);
        let existing = matched_topic(None);

        let topic = reconciler
            .reconcile(&summary, Some(&existing), run_date(), Utc::now())
            .await;

        assert_eq!(topic.category.as_deref(), Some("Economy"));
        assert_eq!(labeler.label_calls(), 0);
        assert_eq!(labeler.category_calls(), 1);
    }

    #[tokio::test]
    async fn test_labeling_failure_uses_fallbacks() {
        let labeler = MockLabeler::failing();
        let reconciler = TopicReconciler::new(&labeler, 5);

        let d1 = doc("a", "Some headline", "wire-a");
        let summary = cluster(vec![&d1]);

        let topic = reconciler
            .reconcile(&summary, None, run_date(), Utc::now())
            .await;

        assert_eq!(topic.topic_name, FALLBACK_LABEL);
        assert_eq!(topic.category.as_deref(), Some(FALLBACK_CATEGORY));
    }

    #[tokio::test]
    async fn test_representative_titles_distinct_non_empty_capped() {
        let labeler = MockLabeler::new();
        let reconciler = TopicReconciler::new(&labeler, 5);

        let docs: Vec<Document> = vec![
            doc("a", "One", "s"),
            doc("b", "", "s"),
            doc("c", "One", "s"),
            doc("d", "Two", "s"),
            doc("e", "Three", "s"),
            doc("f", "Four", "s"),
            doc("g", "Five", "s"),
            doc("h", "Six", "s"),
        ];
        let summary = cluster(docs.iter().collect());

        let topic = reconciler
            .reconcile(&summary, None, run_date(), Utc::now())
            .await;

        assert_eq!(
            topic.representative_titles,
            ["One", "Two", "Three", "Four", "Five"]
        );
    }

    #[tokio::test]
    async fn test_articles_list_replaced_with_run_members() {
        let labeler = MockLabeler::new();
        let reconciler = TopicReconciler::new(&labeler, 5);

        let d1 = doc("a", "Budget talks resume", "wire-a");
        let summary = cluster(vec![&d1]);
        let existing = matched_topic(Some("Politics"));

        let topic = reconciler
            .reconcile(&summary, Some(&existing), run_date(), Utc::now())
            .await;

        assert_eq!(topic.articles.len(), 1);
        assert_eq!(topic.articles[0].title, "Budget talks resume");
        assert_eq!(topic.articles[0].url.as_deref(), Some("https://example.com/a"));
    }
}
