//! Data sources joined by enrichment.
//!
//! Each source is fetched independently by the search client. The client
//! itself lives outside this crate; it is reached through [`TopicSources`].

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use topic_types::{AggregationMap, AltCountMap, EntityRecord, ResourceAggResponse, TopicHit};

use crate::error::SourceError;

/// Identifies one of the joined sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    TopicHits,
    Authors,
    AltCounts,
    StrictAggregations,
    LooseAggregations,
    Locations,
    RelatedTopics,
    Events,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::TopicHits => "topic_hits",
            SourceKind::Authors => "authors",
            SourceKind::AltCounts => "alt_counts",
            SourceKind::StrictAggregations => "strict_aggregations",
            SourceKind::LooseAggregations => "loose_aggregations",
            SourceKind::Locations => "locations",
            SourceKind::RelatedTopics => "related_topics",
            SourceKind::Events => "events",
        }
    }

    /// All sources, in join order.
    pub fn all() -> &'static [SourceKind] {
        &[
            SourceKind::TopicHits,
            SourceKind::Authors,
            SourceKind::AltCounts,
            SourceKind::StrictAggregations,
            SourceKind::LooseAggregations,
            SourceKind::Locations,
            SourceKind::RelatedTopics,
            SourceKind::Events,
        ]
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access to the independently fetched inputs of an enrichment pass.
///
/// Implementations wrap the search client; every method is one request.
#[async_trait]
pub trait TopicSources: Send + Sync {
    /// Topic search hits, in rank order.
    async fn topic_hits(&self) -> Result<Vec<TopicHit>, SourceError>;

    /// Author candidates referenced by the strict aggregations.
    async fn authors(&self) -> Result<Vec<EntityRecord>, SourceError>;

    /// Hit totals keyed by alternate name.
    async fn alt_counts(&self) -> Result<AltCountMap, SourceError>;

    /// Resource aggregations keyed by topic identity.
    async fn strict_aggregations(&self) -> Result<AggregationMap, SourceError>;

    /// Resource aggregations keyed by preferred name.
    async fn loose_aggregations(&self) -> Result<AggregationMap, SourceError>;

    async fn locations(&self) -> Result<Vec<EntityRecord>, SourceError>;

    async fn related_topics(&self) -> Result<Vec<EntityRecord>, SourceError>;

    async fn events(&self) -> Result<Vec<EntityRecord>, SourceError>;
}

/// Everything one enrichment pass joined, once all sources settled.
#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
    pub topics: Vec<TopicHit>,
    pub authors: Vec<EntityRecord>,
    pub alt_counts: AltCountMap,
    pub strict: AggregationMap,
    pub loose: AggregationMap,
    pub locations: Vec<EntityRecord>,
    pub related_topics: Vec<EntityRecord>,
    pub events: Vec<EntityRecord>,
}

/// Mock sources for testing.
#[derive(Default)]
pub struct MockTopicSources {
    pub snapshot: SourceSnapshot,
    /// Simulated latency per source
    pub delays: HashMap<SourceKind, Duration>,
    /// Which sources to fail
    pub fail_sources: HashSet<SourceKind>,
    calls: AtomicUsize,
}

impl MockTopicSources {
    pub fn new(snapshot: SourceSnapshot) -> Self {
        Self {
            snapshot,
            ..Default::default()
        }
    }

    pub fn with_topics(mut self, topics: Vec<TopicHit>) -> Self {
        self.snapshot.topics = topics;
        self
    }

    pub fn with_authors(mut self, authors: Vec<EntityRecord>) -> Self {
        self.snapshot.authors = authors;
        self
    }

    pub fn with_alt_count(mut self, name: impl Into<String>, count: u64) -> Self {
        self.snapshot.alt_counts.insert(name.into(), count);
        self
    }

    pub fn with_strict(mut self, identity: impl Into<String>, aggs: ResourceAggResponse) -> Self {
        self.snapshot.strict.insert(identity.into(), aggs);
        self
    }

    pub fn with_loose(mut self, name: impl Into<String>, aggs: ResourceAggResponse) -> Self {
        self.snapshot.loose.insert(name.into(), aggs);
        self
    }

    pub fn with_locations(mut self, locations: Vec<EntityRecord>) -> Self {
        self.snapshot.locations = locations;
        self
    }

    pub fn with_related_topics(mut self, related: Vec<EntityRecord>) -> Self {
        self.snapshot.related_topics = related;
        self
    }

    pub fn with_events(mut self, events: Vec<EntityRecord>) -> Self {
        self.snapshot.events = events;
        self
    }

    /// Add delay for a source.
    pub fn with_delay(mut self, kind: SourceKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }

    /// Mark a source as failing.
    pub fn with_failure(mut self, kind: SourceKind) -> Self {
        self.fail_sources.insert(kind);
        self
    }

    /// Number of source requests served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn serve<T: Clone + Sync>(&self, kind: SourceKind, value: &T) -> Result<T, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&kind) {
            tokio::time::sleep(*delay).await;
        }

        if self.fail_sources.contains(&kind) {
            return Err(SourceError::Unavailable(format!("{} source failed", kind)));
        }

        Ok(value.clone())
    }
}

#[async_trait]
impl TopicSources for MockTopicSources {
    async fn topic_hits(&self) -> Result<Vec<TopicHit>, SourceError> {
        self.serve(SourceKind::TopicHits, &self.snapshot.topics).await
    }

    async fn authors(&self) -> Result<Vec<EntityRecord>, SourceError> {
        self.serve(SourceKind::Authors, &self.snapshot.authors).await
    }

    async fn alt_counts(&self) -> Result<AltCountMap, SourceError> {
        self.serve(SourceKind::AltCounts, &self.snapshot.alt_counts)
            .await
    }

    async fn strict_aggregations(&self) -> Result<AggregationMap, SourceError> {
        self.serve(SourceKind::StrictAggregations, &self.snapshot.strict)
            .await
    }

    async fn loose_aggregations(&self) -> Result<AggregationMap, SourceError> {
        self.serve(SourceKind::LooseAggregations, &self.snapshot.loose)
            .await
    }

    async fn locations(&self) -> Result<Vec<EntityRecord>, SourceError> {
        self.serve(SourceKind::Locations, &self.snapshot.locations)
            .await
    }

    async fn related_topics(&self) -> Result<Vec<EntityRecord>, SourceError> {
        self.serve(SourceKind::RelatedTopics, &self.snapshot.related_topics)
            .await
    }

    async fn events(&self) -> Result<Vec<EntityRecord>, SourceError> {
        self.serve(SourceKind::Events, &self.snapshot.events).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_all() {
        let all = SourceKind::all();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], SourceKind::TopicHits);
        assert_eq!(SourceKind::StrictAggregations.to_string(), "strict_aggregations");
    }

    #[tokio::test]
    async fn test_mock_serves_snapshot() {
        let mock = MockTopicSources::default()
            .with_authors(vec![EntityRecord::new("p-1", "Ada")])
            .with_alt_count("Klima", 12);

        assert_eq!(mock.authors().await.unwrap().len(), 1);
        assert_eq!(mock.alt_counts().await.unwrap()["Klima"], 12);
        assert!(mock.events().await.unwrap().is_empty());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockTopicSources::default().with_failure(SourceKind::Locations);
        let err = mock.locations().await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
        assert!(mock.topic_hits().await.is_ok());
    }
}
