//! Topic enrichment: join all sources, then merge per topic hit.
//!
//! The join is all-or-nothing. Every source request is issued up front and
//! awaited together; the first failure fails the pass and no partial topic
//! list is produced. Retries belong to the search client, not here.
//!
//! Strict aggregations are looked up by the topic's canonical identity
//! (`@id`), loose aggregations by its preferred name.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use topic_types::{AdditionalType, EnrichmentVariant, TermAggregation, Topic, TopicHit};

use crate::convert::convert_aggregation;
use crate::error::{EnrichError, SourceError};
use crate::resolver::resolve_entities;
use crate::sources::{SourceKind, SourceSnapshot, TopicSources};

/// Await one source and tag its failure with the source kind.
async fn fetch<T, F>(kind: SourceKind, request: F) -> Result<T, EnrichError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    request.await.map_err(|error| {
        warn!(source = %kind, error = %error, "Enrichment source failed");
        EnrichError::Source { kind, error }
    })
}

/// Joins the configured sources and merges them into topic records.
pub struct TopicEnricher<S> {
    sources: Arc<S>,
    variant: EnrichmentVariant,
}

impl<S: TopicSources + 'static> TopicEnricher<S> {
    /// Create an enricher joining all eight sources.
    pub fn new(sources: Arc<S>) -> Self {
        Self {
            sources,
            variant: EnrichmentVariant::Full,
        }
    }

    /// Set which sources are joined.
    pub fn with_variant(mut self, variant: EnrichmentVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn variant(&self) -> EnrichmentVariant {
        self.variant
    }

    /// Fetch all sources and merge them, preserving topic hit order.
    #[instrument(skip(self), fields(variant = ?self.variant))]
    pub async fn enrich(&self) -> Result<Vec<Topic>, EnrichError> {
        let start = Instant::now();
        let snapshot = self.join_sources().await?;

        debug!(
            hits = snapshot.topics.len(),
            strict = snapshot.strict.len(),
            loose = snapshot.loose.len(),
            "All enrichment sources settled"
        );

        let topics = merge_topics(&snapshot);

        info!(
            topics = topics.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Enrichment complete"
        );

        Ok(topics)
    }

    /// Issue every source request concurrently and wait for all of them.
    pub async fn join_sources(&self) -> Result<SourceSnapshot, EnrichError> {
        let s = self.sources.as_ref();

        match self.variant {
            EnrichmentVariant::Full => {
                let (topics, authors, alt_counts, strict, loose, locations, related_topics, events) =
                    tokio::try_join!(
                        fetch(SourceKind::TopicHits, s.topic_hits()),
                        fetch(SourceKind::Authors, s.authors()),
                        fetch(SourceKind::AltCounts, s.alt_counts()),
                        fetch(SourceKind::StrictAggregations, s.strict_aggregations()),
                        fetch(SourceKind::LooseAggregations, s.loose_aggregations()),
                        fetch(SourceKind::Locations, s.locations()),
                        fetch(SourceKind::RelatedTopics, s.related_topics()),
                        fetch(SourceKind::Events, s.events()),
                    )?;

                Ok(SourceSnapshot {
                    topics,
                    authors,
                    alt_counts,
                    strict,
                    loose,
                    locations,
                    related_topics,
                    events,
                })
            }
            EnrichmentVariant::Basic => {
                let (topics, authors, alt_counts, strict, loose) = tokio::try_join!(
                    fetch(SourceKind::TopicHits, s.topic_hits()),
                    fetch(SourceKind::Authors, s.authors()),
                    fetch(SourceKind::AltCounts, s.alt_counts()),
                    fetch(SourceKind::StrictAggregations, s.strict_aggregations()),
                    fetch(SourceKind::LooseAggregations, s.loose_aggregations()),
                )?;

                Ok(SourceSnapshot {
                    topics,
                    authors,
                    alt_counts,
                    strict,
                    loose,
                    ..Default::default()
                })
            }
        }
    }
}

/// Merge a settled snapshot into one topic per hit, in hit order.
pub fn merge_topics(snapshot: &SourceSnapshot) -> Vec<Topic> {
    snapshot
        .topics
        .iter()
        .map(|hit| merge_hit(hit, snapshot))
        .collect()
}

fn merge_hit(hit: &TopicHit, snapshot: &SourceSnapshot) -> Topic {
    let source = &hit.source;

    let strict = snapshot.strict.get(&source.identity);
    let loose = snapshot.loose.get(&source.preferred_name);

    // Only the first alternate name is looked up
    let alternate_name = source.alternate_name.first().cloned();
    let alt_count = alternate_name
        .as_ref()
        .and_then(|name| snapshot.alt_counts.get(name))
        .copied();

    let additional_types = source
        .additional_type
        .iter()
        .map(|t| AdditionalType {
            id: t.identity.clone(),
            name: t.name.clone(),
            description: t.description.clone(),
        })
        .collect();

    // A missing strict aggregation leaves the entity mappings empty
    let authors = resolve_entities(strict, &snapshot.authors, TermAggregation::TopAuthors)
        .unwrap_or_default();
    let locations = resolve_entities(strict, &snapshot.locations, TermAggregation::Mentions)
        .unwrap_or_default();
    let related = resolve_entities(strict, &snapshot.related_topics, TermAggregation::Mentions)
        .unwrap_or_default();
    let events =
        resolve_entities(strict, &snapshot.events, TermAggregation::Mentions).unwrap_or_default();

    if strict.is_none() {
        debug!(topic = %source.preferred_name, "No strict aggregation for topic");
    }

    Topic {
        id: hit.id.clone(),
        name: source.preferred_name.clone(),
        alternate_name,
        description: source.description.clone(),
        score: hit.score,
        additional_types,
        aggregations: strict.map(convert_aggregation),
        aggregations_loose: loose.map(convert_aggregation),
        alt_count,
        authors,
        locations,
        related,
        events,
    }
}
