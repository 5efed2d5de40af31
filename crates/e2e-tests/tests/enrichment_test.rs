//! End-to-end enrichment tests.
//!
//! Sources are decoded from search-index JSON, joined by the enricher and
//! checked field by field.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use e2e_tests::{aggregation, climate_sources, entity, topic_hit};
use topic_enrich::{
    convert_aggregation, resolve_entities, EnrichError, MockTopicSources, SourceKind,
    TopicEnricher,
};
use topic_types::{Entity, EnrichmentVariant, TermAggregation, YearCount};

#[tokio::test]
async fn test_climate_topic_fully_enriched() {
    let enricher = TopicEnricher::new(Arc::new(climate_sources()));
    let topics = enricher.enrich().await.unwrap();

    let names: Vec<&str> = topics.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Climate", "Policy"]);

    let climate = &topics[0];
    assert_eq!(climate.id, "doc:topic:climate");
    assert_eq!(climate.alternate_name.as_deref(), Some("Klima"));
    assert_eq!(climate.alt_count, Some(11));

    let aggs = climate.aggregations.as_ref().unwrap();
    assert_eq!(aggs.doc_count, 42);
    assert_eq!(
        aggs.date_published,
        vec![
            YearCount { year: 2020, count: 3 },
            YearCount { year: 2021, count: 5 },
        ]
    );
    assert_eq!(climate.loose_count(), Some(120));

    // Unknown author dropped, the rest resolved against their own candidate list
    assert_eq!(climate.authors.len(), 1);
    assert_eq!(climate.authors.get("person:ada"), Some(7));
    assert_eq!(climate.locations.get("place:arctic"), Some(4));
    assert_eq!(climate.events.get("event:cop21"), Some(2));
    assert_eq!(
        climate.related_names().collect::<Vec<_>>(),
        vec!["Policy", "Reef"]
    );
}

#[tokio::test]
async fn test_absent_aggregation_gives_empty_mappings() {
    let enricher = TopicEnricher::new(Arc::new(climate_sources()));
    let topics = enricher.enrich().await.unwrap();

    let policy = &topics[1];
    assert!(policy.aggregations.is_none());
    assert!(policy.aggregations_loose.is_none());
    assert!(policy.alt_count.is_none());
    assert!(policy.authors.is_empty());
    assert!(policy.locations.is_empty());
    assert!(policy.related.is_empty());
    assert!(policy.events.is_empty());
}

#[tokio::test]
async fn test_any_failing_source_fails_the_pass() {
    for kind in SourceKind::all() {
        let enricher = TopicEnricher::new(Arc::new(climate_sources().with_failure(*kind)));
        let err = enricher.enrich().await.unwrap_err();
        assert!(
            matches!(err, EnrichError::Source { kind: k, .. } if k == *kind),
            "expected {} failure, got {}",
            kind,
            err
        );
    }
}

#[tokio::test]
async fn test_basic_variant_skips_entity_sources() {
    let sources = Arc::new(
        climate_sources()
            .with_failure(SourceKind::Locations)
            .with_failure(SourceKind::Events),
    );
    let enricher =
        TopicEnricher::new(Arc::clone(&sources)).with_variant(EnrichmentVariant::Basic);

    let topics = enricher.enrich().await.unwrap();
    assert_eq!(sources.call_count(), 5);
    assert_eq!(topics[0].authors.get("person:ada"), Some(7));
    assert!(topics[0].locations.is_empty());
    assert!(topics[0].related.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_sources_are_fetched_concurrently() {
    let mut sources = climate_sources();
    for kind in SourceKind::all() {
        sources = sources.with_delay(*kind, Duration::from_millis(100));
    }
    let enricher = TopicEnricher::new(Arc::new(sources));

    let start = tokio::time::Instant::now();
    enricher.enrich().await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(200));
}

#[test]
fn test_resolve_keys_are_subset_of_candidates() {
    let candidates = vec![
        entity("person:ada", "Ada"),
        entity("person:grace", "Grace"),
        entity("person:alan", "Alan"),
    ];
    let fixtures = [
        aggregation(3, &[], &[], &[]),
        aggregation(3, &[("person:ada", 1)], &[], &[]),
        aggregation(
            9,
            &[("person:ada", 4), ("person:nobody", 3), ("person:alan", 2)],
            &[],
            &[],
        ),
        aggregation(
            2,
            &[("person:x", 1), ("person:y", 1)],
            &[],
            &[("person:grace", 1)],
        ),
    ];

    for aggs in &fixtures {
        for name in [TermAggregation::TopAuthors, TermAggregation::Mentions] {
            let resolved = resolve_entities(Some(aggs), &candidates, name).unwrap();
            assert!(resolved.len() <= aggs.term_buckets(name).len());
            for e in resolved.entities() {
                assert!(candidates.iter().any(|c| c.entity_id() == e.entity_id()));
            }
        }
    }

    assert!(resolve_entities(None, &candidates, TermAggregation::TopAuthors).is_none());
}

#[test]
fn test_convert_preserves_total() {
    for total in [0, 1, 42, 10_000] {
        let aggs = aggregation(total, &[("a", 1)], &[(0, 1)], &[("m", 2)]);
        assert_eq!(convert_aggregation(&aggs).doc_count, total);
    }
}

#[tokio::test]
async fn test_strict_aggregation_keyed_by_identity_not_name() {
    // A strict aggregation registered under the display name is not picked up
    let sources = MockTopicSources::default()
        .with_topics(vec![topic_hit("topic:ocean", "Ocean", &[])])
        .with_strict("Ocean", aggregation(8, &[], &[], &[]));
    let topics = TopicEnricher::new(Arc::new(sources)).enrich().await.unwrap();
    assert!(topics[0].aggregations.is_none());
}
