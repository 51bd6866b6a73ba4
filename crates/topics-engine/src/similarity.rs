//! Vector similarity functions.
//!
//! Pure Rust implementations without external dependencies.

use crate::error::EngineError;

/// Calculate cosine similarity between two vectors.
///
/// Returns value in [-1.0, 1.0] where 1.0 = identical direction.
/// A zero vector on either side yields 0.0.
///
/// # Panics
/// Panics if vectors have different dimensions.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have same dimension");

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = norm(a);
    let norm_b = norm(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Calculate the centroid of a cluster's member embeddings.
///
/// Returns the element-wise arithmetic mean. The result is deliberately
/// NOT normalized: the stored topic centroid is the raw mean, and only
/// the matcher works with unit vectors.
pub fn centroid(embeddings: &[&[f32]]) -> Result<Vec<f32>, EngineError> {
    if embeddings.is_empty() {
        return Err(EngineError::EmptyCluster);
    }

    let dim = embeddings[0].len();
    let n = embeddings.len() as f32;
    let mut mean = vec![0.0f32; dim];

    for embedding in embeddings {
        assert_eq!(
            embedding.len(),
            dim,
            "All embeddings must have same dimension"
        );
        for (i, &val) in embedding.iter().enumerate() {
            mean[i] += val;
        }
    }

    for val in mean.iter_mut() {
        *val /= n;
    }

    Ok(mean)
}

/// Euclidean norm of a vector.
pub fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Normalize a vector to unit length in place. A zero vector is left
/// untouched.
pub fn normalize(v: &mut [f32]) {
    let n = norm(v);
    if n > 0.0 {
        for val in v.iter_mut() {
            *val /= n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_self_is_one() {
        let a = vec![0.3, -1.2, 4.5];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_symmetric() {
        let a = vec![0.8, 0.6, -0.2];
        let b = vec![0.1, 0.9, 0.4];
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.001);
    }

    #[test]
    fn test_centroid_is_raw_mean() {
        let e1 = vec![1.0, 0.0, 0.0];
        let e2 = vec![0.0, 1.0, 0.0];
        let embeddings: Vec<&[f32]> = vec![&e1, &e2];
        let mean = centroid(&embeddings).unwrap();
        // Mean of [1,0,0] and [0,1,0], no normalization
        assert!((mean[0] - 0.5).abs() < 0.001);
        assert!((mean[1] - 0.5).abs() < 0.001);
        assert!(mean[2].abs() < 0.001);
    }

    #[test]
    fn test_centroid_single_member() {
        let e1 = vec![3.0, 4.0];
        let embeddings: Vec<&[f32]> = vec![&e1];
        let mean = centroid(&embeddings).unwrap();
        assert!((mean[0] - 3.0).abs() < 0.001);
        assert!((mean[1] - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_centroid_empty_is_error() {
        let embeddings: Vec<&[f32]> = vec![];
        assert!(matches!(
            centroid(&embeddings),
            Err(EngineError::EmptyCluster)
        ));
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 0.001);
        assert!((v[1] - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let mut v = vec![0.0, 0.0];
        normalize(&mut v);
        assert!(v[0].abs() < 0.001);
        assert!(v[1].abs() < 0.001);
    }

    #[test]
    #[should_panic(expected = "Vectors must have same dimension")]
    fn test_cosine_similarity_different_dimensions() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        cosine_similarity(&a, &b);
    }
}
