//! # topic-graph
//!
//! Builds the node/link graph shown by the topic explorer.
//!
//! Input is the list of enriched topics plus the flattened co-occurrence
//! matrix of topic names. Output is a graph whose node ids are unique and
//! whose links only reference existing nodes.
//!
//! ## Features
//! - Primary nodes for queried topics, secondary placeholders for names that
//!   are only referenced
//! - Id-derived links from resolved related topics
//! - Name-derived links from the relation matrix, diagonal cells skipped
//! - Explicit node precedence ([`policy::resolve_node`]) and configurable
//!   link dedup ([`policy::dedup_links`])

pub mod builder;
pub mod policy;
pub mod relation;

pub use builder::{BuildReport, GraphBuilder};
pub use policy::{dedup_links, resolve_node, MergeDecision};
pub use relation::{RelationCell, RELATION_SEPARATOR};
