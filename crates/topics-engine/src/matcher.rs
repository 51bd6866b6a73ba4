//! Matching cluster centroids against active topics.

use tracing::debug;

use topics_types::ActiveTopic;

use crate::error::EngineError;
use crate::similarity::{cosine_similarity, norm};

/// Find the active topic a cluster continues, if any.
///
/// Compares the candidate centroid against every active topic by cosine
/// similarity and returns the one with the strictly greatest similarity
/// exceeding `threshold`. Similarity exactly at the threshold does not
/// match. On equal scores the first topic encountered wins; iteration
/// order is whatever order the active set was fetched in.
///
/// Stored centroids with a different dimensionality (e.g. written by an
/// older embedding model) or zero norm are skipped.
///
/// # Errors
/// `DegenerateCentroid` when the candidate centroid has zero norm and
/// cannot be normalized; the caller should treat the cluster as
/// unmatched and log the anomaly.
pub fn find_matching_topic<'a>(
    centroid: &[f32],
    active_topics: &'a [ActiveTopic],
    threshold: f32,
) -> Result<Option<&'a ActiveTopic>, EngineError> {
    if norm(centroid) == 0.0 {
        return Err(EngineError::DegenerateCentroid);
    }
    if active_topics.is_empty() {
        return Ok(None);
    }

    let mut best_score = threshold;
    let mut best_match = None;

    for topic in active_topics {
        if topic.centroid.len() != centroid.len() {
            debug!(
                topic_id = %topic.id,
                stored_dim = topic.centroid.len(),
                candidate_dim = centroid.len(),
                "Skipping topic with mismatched centroid dimension"
            );
            continue;
        }
        if norm(&topic.centroid) == 0.0 {
            debug!(topic_id = %topic.id, "Skipping topic with zero-norm centroid");
            continue;
        }

        let similarity = cosine_similarity(centroid, &topic.centroid);
        if similarity > best_score {
            best_score = similarity;
            best_match = Some(topic);
        }
    }

    Ok(best_match)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn active_topic(id: &str, centroid: Vec<f32>) -> ActiveTopic {
        ActiveTopic {
            id: id.to_string(),
            topic_name: format!("Topic {}", id),
            centroid,
            article_count: 3,
            first_seen: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            total_articles_seen: 3,
            category: None,
        }
    }

    #[test]
    fn test_empty_active_set_is_no_match() {
        let result = find_matching_topic(&[1.0, 0.0], &[], 0.70).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_identical_direction_matches() {
        let topics = vec![active_topic("t1", vec![2.0, 2.0])];
        let result = find_matching_topic(&[1.0, 1.0], &topics, 0.70).unwrap();
        assert_eq!(result.unwrap().id, "t1");
    }

    #[test]
    fn test_best_of_several_wins() {
        let topics = vec![
            active_topic("off-axis", vec![1.0, 0.6]),
            active_topic("aligned", vec![1.0, 1.0]),
            active_topic("orthogonal", vec![-1.0, 1.0]),
        ];
        let result = find_matching_topic(&[1.0, 1.0], &topics, 0.70).unwrap();
        assert_eq!(result.unwrap().id, "aligned");
    }

    #[test]
    fn test_similarity_below_threshold_is_no_match() {
        // cos(45°) ≈ 0.707 with threshold 0.9
        let topics = vec![active_topic("t1", vec![1.0, 0.0])];
        let result = find_matching_topic(&[1.0, 1.0], &topics, 0.9).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_similarity_exactly_at_threshold_is_no_match() {
        // Identical vectors give similarity 1.0; with threshold 1.0 the
        // strict inequality must reject the match.
        let topics = vec![active_topic("t1", vec![1.0, 0.0])];
        let result = find_matching_topic(&[1.0, 0.0], &topics, 1.0).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_tie_first_encountered_wins() {
        // Two topics with identical centroids: equal similarity, so the
        // second never strictly exceeds the first's score.
        let topics = vec![
            active_topic("first", vec![1.0, 1.0]),
            active_topic("second", vec![1.0, 1.0]),
        ];
        let result = find_matching_topic(&[1.0, 1.0], &topics, 0.70).unwrap();
        assert_eq!(result.unwrap().id, "first");
    }

    #[test]
    fn test_degenerate_candidate_centroid() {
        let topics = vec![active_topic("t1", vec![1.0, 0.0])];
        let result = find_matching_topic(&[0.0, 0.0], &topics, 0.70);
        assert!(matches!(result, Err(EngineError::DegenerateCentroid)));
    }

    #[test]
    fn test_zero_norm_stored_centroid_skipped() {
        let topics = vec![
            active_topic("degenerate", vec![0.0, 0.0]),
            active_topic("good", vec![1.0, 1.0]),
        ];
        let result = find_matching_topic(&[1.0, 1.0], &topics, 0.70).unwrap();
        assert_eq!(result.unwrap().id, "good");
    }

    #[test]
    fn test_mismatched_dimension_skipped() {
        let topics = vec![
            active_topic("old-model", vec![1.0, 1.0, 1.0]),
            active_topic("current", vec![1.0, 1.0]),
        ];
        let result = find_matching_topic(&[1.0, 1.0], &topics, 0.70).unwrap();
        assert_eq!(result.unwrap().id, "current");
    }
}
