//! Search-index response shapes consumed by enrichment.
//!
//! These mirror the JSON the search client hands back: topic hits, entity
//! documents fetched by id, resource aggregations and the relation matrix.
//! Field names follow the index mapping (`@id`, `preferredName`, `doc_count`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Anything that can be looked up by its `@id` and shown by name.
pub trait Entity {
    /// Canonical identity (the `@id` field).
    fn entity_id(&self) -> &str;

    /// Human-readable name used as a graph label.
    fn display_name(&self) -> &str;
}

/// A single topic hit returned by the topic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicHit {
    /// Index document id
    #[serde(rename = "_id")]
    pub id: String,

    /// Relevance score assigned by the index
    #[serde(rename = "_score", default)]
    pub score: f64,

    /// Stored document fields
    #[serde(rename = "_source")]
    pub source: TopicSource,
}

/// Stored fields of a topic document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSource {
    /// Canonical identity of the topic
    #[serde(rename = "@id")]
    pub identity: String,

    pub preferred_name: String,

    /// Alternate names, most common first
    #[serde(default)]
    pub alternate_name: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Classification references
    #[serde(default)]
    pub additional_type: Vec<AdditionalTypeRef>,
}

/// Reference to a classification type as stored on a topic document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalTypeRef {
    #[serde(rename = "@id")]
    pub identity: String,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// A candidate entity document (person, place, topic or event).
///
/// Only identity and name are interpreted; every other field is carried
/// through untouched so renderers can show whatever the index stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(rename = "@id")]
    pub identity: String,

    #[serde(rename = "preferredName", default)]
    pub preferred_name: Option<String>,

    /// Remaining document fields
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl EntityRecord {
    /// Create a record with identity and name and no extra fields.
    pub fn new(identity: impl Into<String>, preferred_name: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            preferred_name: Some(preferred_name.into()),
            fields: serde_json::Map::new(),
        }
    }
}

impl Entity for EntityRecord {
    fn entity_id(&self) -> &str {
        &self.identity
    }

    fn display_name(&self) -> &str {
        self.preferred_name.as_deref().unwrap_or(&self.identity)
    }
}

/// Hit total as reported by the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitsTotal {
    pub value: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hits {
    pub total: HitsTotal,
}

/// Terms-aggregation bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermBucket {
    pub key: String,
    pub doc_count: u64,
}

impl TermBucket {
    pub fn new(key: impl Into<String>, doc_count: u64) -> Self {
        Self {
            key: key.into(),
            doc_count,
        }
    }
}

/// Date-histogram bucket. `key` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBucket {
    pub key: i64,

    #[serde(default)]
    pub key_as_string: Option<String>,

    pub doc_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketList<B> {
    pub buckets: Vec<B>,
}

impl<B> Default for BucketList<B> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
        }
    }
}

/// The three aggregations requested against the resource index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAggregations {
    #[serde(default)]
    pub top_authors: BucketList<TermBucket>,

    #[serde(default)]
    pub date_published: BucketList<DateBucket>,

    #[serde(default)]
    pub mentions: BucketList<TermBucket>,
}

/// Name of a terms aggregation whose bucket keys reference entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TermAggregation {
    /// Author identities
    TopAuthors,
    /// Mentioned entity identities
    Mentions,
}

impl TermAggregation {
    /// Aggregation name as sent to the index.
    pub fn as_str(&self) -> &'static str {
        match self {
            TermAggregation::TopAuthors => "topAuthors",
            TermAggregation::Mentions => "mentions",
        }
    }
}

impl std::fmt::Display for TermAggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregation response for the resources associated with one topic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceAggResponse {
    pub hits: Hits,
    pub aggregations: ResourceAggregations,
}

impl ResourceAggResponse {
    /// Buckets of the named terms aggregation.
    pub fn term_buckets(&self, name: TermAggregation) -> &[TermBucket] {
        match name {
            TermAggregation::TopAuthors => &self.aggregations.top_authors.buckets,
            TermAggregation::Mentions => &self.aggregations.mentions.buckets,
        }
    }

    /// Reported hit total.
    pub fn total_hits(&self) -> u64 {
        self.hits.total.value
    }
}

/// Resource aggregations keyed per topic (by identity or by name).
pub type AggregationMap = HashMap<String, ResourceAggResponse>;

/// Hit totals keyed by alternate name.
pub type AltCountMap = HashMap<String, u64>;

/// One cell of the flattened co-occurrence matrix.
///
/// `key` is `"<source>&<target>"`; diagonal cells carry only `"<source>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRow {
    pub key: String,
    pub doc_count: u64,
}

impl RelationRow {
    pub fn new(key: impl Into<String>, doc_count: u64) -> Self {
        Self {
            key: key.into(),
            doc_count,
        }
    }
}
