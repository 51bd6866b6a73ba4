//! # topics-types
//!
//! Shared domain types for the news-topics system.
//!
//! This crate defines the data structures that cross crate boundaries:
//! - Documents: immutable fetched articles with their raw embeddings
//! - Topics: persistent cross-run topic identities
//! - ActiveTopic: the matching-time projection of a stored topic

pub mod document;
pub mod topic;

pub use document::{ArticleRef, Document};
pub use topic::{ActiveTopic, Topic, DAILY_TOPIC_TYPE};
