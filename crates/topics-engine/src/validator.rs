//! Embedding validation.
//!
//! Embeddings arrive as raw JSON values; this module coerces each one to
//! a flat `Vec<f32>` and quarantines anything malformed so one bad
//! article never fails the batch. It also collects the set of distinct
//! dimensionalities: clustering only makes sense when every usable
//! vector has the same dimension, and the analyzer degrades the whole
//! run to noise when they do not.

use std::collections::BTreeSet;

use tracing::warn;

use topics_types::Document;

/// A document tagged with its coerced embedding, when coercion worked.
#[derive(Debug, Clone)]
pub struct ValidatedDocument {
    /// The original document, untouched
    pub document: Document,

    /// The coerced flat vector; `None` marks the document unusable
    pub vector: Option<Vec<f32>>,
}

impl ValidatedDocument {
    /// Whether this document can participate in clustering.
    pub fn usable(&self) -> bool {
        self.vector.is_some()
    }
}

/// Outcome of validating one batch of documents.
#[derive(Debug)]
pub struct BatchValidation {
    /// All input documents, in input order
    pub documents: Vec<ValidatedDocument>,

    dimensions: BTreeSet<usize>,
}

impl BatchValidation {
    /// True when at most one distinct dimensionality is present among
    /// usable vectors. A non-uniform batch must not be clustered.
    pub fn is_uniform(&self) -> bool {
        self.dimensions.len() <= 1
    }

    /// Distinct dimensionalities observed among usable vectors.
    pub fn dimensions(&self) -> &BTreeSet<usize> {
        &self.dimensions
    }

    /// Number of usable documents.
    pub fn usable_count(&self) -> usize {
        self.documents.iter().filter(|d| d.usable()).count()
    }
}

/// Validate a batch of documents.
///
/// Pure function: logs per-document failures but produces no other side
/// effects. Input order is preserved.
pub fn validate_batch(documents: Vec<Document>) -> BatchValidation {
    let mut validated = Vec::with_capacity(documents.len());
    let mut dimensions = BTreeSet::new();

    for document in documents {
        let vector = match coerce_vector(&document.embedding) {
            Ok(vector) => {
                dimensions.insert(vector.len());
                Some(vector)
            }
            Err(reason) => {
                warn!(
                    article_id = %document.id,
                    reason = %reason,
                    "Skipping article with invalid embedding"
                );
                None
            }
        };
        validated.push(ValidatedDocument { document, vector });
    }

    BatchValidation {
        documents: validated,
        dimensions,
    }
}

/// Coerce a raw JSON value to a flat real-valued vector.
fn coerce_vector(value: &serde_json::Value) -> Result<Vec<f32>, String> {
    let items = value.as_array().ok_or("embedding is not an array")?;
    if items.is_empty() {
        return Err("embedding is empty".to_string());
    }

    let mut vector = Vec::with_capacity(items.len());
    for item in items {
        let number = item
            .as_f64()
            .ok_or("embedding contains a non-numeric element")?;
        if !number.is_finite() {
            return Err("embedding contains a non-finite element".to_string());
        }
        vector.push(number as f32);
    }
    Ok(vector)
}
