//! Analyzer configuration.

use serde::{Deserialize, Serialize};

/// Configuration for one analyzer run.
///
/// The clustering and matching parameters have fixed, tuned defaults;
/// they are carried in configuration so deployments can widen the
/// article window without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// How far back to fetch articles, in hours
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,

    /// How far back a stored topic counts as active, in days
    #[serde(default = "default_active_window_days")]
    pub active_window_days: u32,

    /// DBSCAN neighborhood radius (Euclidean)
    #[serde(default = "default_eps")]
    pub eps: f32,

    /// DBSCAN minimum neighborhood size, self included
    #[serde(default = "default_min_points")]
    pub min_points: usize,

    /// Cosine similarity a cluster must strictly exceed to continue an
    /// existing topic
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,

    /// How many distinct titles to store as representative
    #[serde(default = "default_representative_titles")]
    pub representative_titles: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_hours: default_window_hours(),
            active_window_days: default_active_window_days(),
            eps: default_eps(),
            min_points: default_min_points(),
            match_threshold: default_match_threshold(),
            representative_titles: default_representative_titles(),
        }
    }
}

fn default_window_hours() -> u32 {
    24
}
fn default_active_window_days() -> u32 {
    7
}
fn default_eps() -> f32 {
    0.6
}
fn default_min_points() -> usize {
    3
}
fn default_match_threshold() -> f32 {
    0.70
}
fn default_representative_titles() -> usize {
    5
}
