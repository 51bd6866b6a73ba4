//! Key encoding for the storage layer.
//!
//! Article keys: `art:{published_ms:013}:{article_id}` — milliseconds
//! since the Unix epoch, zero-padded to 13 digits so lexicographic order
//! is publication order and a window fetch is one forward range scan.
//! Topic keys: `topic:{topic_id}`.

use crate::error::StoreError;

/// Key for article storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleKey {
    /// Publication timestamp in milliseconds
    pub published_ms: i64,
    /// Article identifier
    pub article_id: String,
}

impl ArticleKey {
    /// Create an article key.
    pub fn new(published_ms: i64, article_id: impl Into<String>) -> Self {
        Self {
            published_ms,
            article_id: article_id.into(),
        }
    }

    /// Encode key to bytes for storage.
    pub fn to_bytes(&self) -> Vec<u8> {
        format!("art:{:013}:{}", self.published_ms, self.article_id).into_bytes()
    }

    /// Decode key from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| StoreError::Key(format!("Invalid UTF-8: {}", e)))?;

        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("art"), Some(ts), Some(id)) => {
                let published_ms: i64 = ts
                    .parse()
                    .map_err(|e| StoreError::Key(format!("Invalid timestamp: {}", e)))?;
                Ok(Self::new(published_ms, id))
            }
            _ => Err(StoreError::Key(format!("Invalid article key format: {}", s))),
        }
    }

    /// Inclusive scan start for all articles published at or after
    /// `start_ms`.
    pub fn prefix_start(start_ms: i64) -> Vec<u8> {
        format!("art:{:013}:", start_ms).into_bytes()
    }
}

/// Key format for topics: `topic:{topic_id}`.
pub fn topic_key(topic_id: &str) -> Vec<u8> {
    format!("topic:{}", topic_id).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_key_round_trip() {
        let key = ArticleKey::new(1_754_000_000_000, "art-42");
        let decoded = ArticleKey::from_bytes(&key.to_bytes()).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_article_key_zero_padded() {
        let key = ArticleKey::new(42, "a");
        assert_eq!(key.to_bytes(), b"art:0000000000042:a");
    }

    #[test]
    fn test_article_keys_sort_by_time() {
        let early = ArticleKey::new(1_000, "z").to_bytes();
        let late = ArticleKey::new(2_000, "a").to_bytes();
        assert!(early < late);
    }

    #[test]
    fn test_prefix_start_sorts_before_same_ms_keys() {
        let prefix = ArticleKey::prefix_start(1_000);
        let key = ArticleKey::new(1_000, "a").to_bytes();
        assert!(prefix <= key);
    }

    #[test]
    fn test_article_key_invalid_format() {
        assert!(ArticleKey::from_bytes(b"topic:abc").is_err());
        assert!(ArticleKey::from_bytes(b"art:notanumber:id").is_err());
        assert!(ArticleKey::from_bytes(b"art").is_err());
    }

    #[test]
    fn test_article_id_with_colons_survives() {
        let key = ArticleKey::new(5, "feed:item:9");
        let decoded = ArticleKey::from_bytes(&key.to_bytes()).unwrap();
        assert_eq!(decoded.article_id, "feed:item:9");
    }

    #[test]
    fn test_topic_key() {
        assert_eq!(topic_key("abc123"), b"topic:abc123");
    }
}
