//! # topic-types
//!
//! Shared domain types for topic-atlas.
//!
//! This crate defines the data structures passed between enrichment and
//! graph construction:
//! - Search: topic hits, entity documents, resource aggregations, relation rows
//! - Topic: enriched topic records and resource aggregations
//! - Graph: nodes, links and the finished graph
//! - Settings: layered configuration

pub mod config;
pub mod error;
pub mod graph;
pub mod search;
pub mod topic;

pub use config::{
    EnrichmentSettings, EnrichmentVariant, GraphSettings, LinkDedupPolicy, Settings,
};
pub use error::TopicError;
pub use graph::{Graph, GraphLink, GraphNode, LinkKind, NodeKind};
pub use search::{
    AdditionalTypeRef, AggregationMap, AltCountMap, BucketList, DateBucket, Entity, EntityRecord,
    Hits, HitsTotal, RelationRow, ResourceAggResponse, ResourceAggregations, TermAggregation,
    TermBucket, TopicHit, TopicSource,
};
pub use topic::{
    AdditionalType, EntityCount, EntityCounts, Mention, ResourceAggregation, Topic, YearCount,
};
