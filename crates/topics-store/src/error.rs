//! Storage layer error types.

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// RocksDB operation failed
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Column family not found
    #[error("Column family not found: {0}")]
    ColumnFamilyNotFound(String),

    /// Key encoding/decoding error
    #[error("Key error: {0}")]
    Key(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<StoreError> for topics_engine::SourceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Serialization(msg) => topics_engine::SourceError::Malformed(msg),
            other => topics_engine::SourceError::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_maps_to_malformed() {
        let err = StoreError::Serialization("bad json".to_string());
        let source: topics_engine::SourceError = err.into();
        assert!(matches!(
            source,
            topics_engine::SourceError::Malformed(_)
        ));
    }

    #[test]
    fn test_key_error_maps_to_unavailable() {
        let err = StoreError::Key("bad key".to_string());
        let source: topics_engine::SourceError = err.into();
        assert!(matches!(
            source,
            topics_engine::SourceError::Unavailable(_)
        ));
    }
}
