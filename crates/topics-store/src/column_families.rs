//! Column family definitions for RocksDB.
//!
//! Two column families isolate the access patterns:
//! - articles: time-keyed article documents, scanned by window
//! - topics: id-keyed topic documents, scanned whole

use rocksdb::{ColumnFamilyDescriptor, Options};

/// Column family name for article documents
pub const CF_ARTICLES: &str = "articles";

/// Column family name for topic documents
pub const CF_TOPICS: &str = "topics";

/// All column family names
pub const ALL_CF_NAMES: &[&str] = &[CF_ARTICLES, CF_TOPICS];

/// Create column family options for articles (append-heavy, compressed)
fn articles_options() -> Options {
    let mut opts = Options::default();
    opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
    opts
}

/// Build all column family descriptors
pub fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    vec![
        ColumnFamilyDescriptor::new(CF_ARTICLES, articles_options()),
        ColumnFamilyDescriptor::new(CF_TOPICS, Options::default()),
    ]
}
