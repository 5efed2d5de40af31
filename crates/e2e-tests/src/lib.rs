//! End-to-end test infrastructure for topic-atlas.
//!
//! Fixtures are written as search-index JSON (`serde_json::json!`) and
//! deserialized into the wire types, so the tests cover decoding as well as
//! enrichment and graph construction.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use topic_enrich::MockTopicSources;
use topic_pipeline::{init_tracing, MockRelationSource, TopicGraphPipeline};
use topic_types::{EntityRecord, RelationRow, ResourceAggResponse, Settings, TopicHit};

/// Decode a JSON fixture.
pub fn decode<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("Failed to decode fixture")
}

/// A topic search hit as returned by the topic index.
pub fn topic_hit(identity: &str, name: &str, alternates: &[&str]) -> TopicHit {
    decode(json!({
        "_id": format!("doc:{}", identity),
        "_score": 1.0,
        "_source": {
            "@id": identity,
            "preferredName": name,
            "alternateName": alternates,
        }
    }))
}

/// An entity document (author, location, related topic or event).
pub fn entity(identity: &str, name: &str) -> EntityRecord {
    decode(json!({ "@id": identity, "preferredName": name }))
}

/// A resource aggregation response.
///
/// `years` are `(epoch_millis, doc_count)` date histogram buckets.
pub fn aggregation(
    total: u64,
    authors: &[(&str, u64)],
    years: &[(i64, u64)],
    mentions: &[(&str, u64)],
) -> ResourceAggResponse {
    let terms = |buckets: &[(&str, u64)]| -> Vec<Value> {
        buckets
            .iter()
            .map(|(key, count)| json!({ "key": key, "doc_count": count }))
            .collect()
    };
    let dates: Vec<Value> = years
        .iter()
        .map(|(key, count)| json!({ "key": key, "doc_count": count }))
        .collect();

    decode(json!({
        "hits": { "total": { "value": total } },
        "aggregations": {
            "topAuthors": { "buckets": terms(authors) },
            "datePublished": { "buckets": dates },
            "mentions": { "buckets": terms(mentions) },
        }
    }))
}

/// Relation matrix rows as returned by the co-occurrence query.
pub fn relation_rows(rows: &[(&str, u64)]) -> Vec<RelationRow> {
    rows.iter()
        .map(|(key, count)| decode(json!({ "key": key, "doc_count": count })))
        .collect()
}

pub type MockPipeline = TopicGraphPipeline<MockTopicSources, MockRelationSource>;

/// Shared test harness for E2E tests.
pub struct TestHarness {
    pub sources: Arc<MockTopicSources>,
    pub relations: Arc<MockRelationSource>,
    pub settings: Settings,
}

impl TestHarness {
    /// Create a harness. Installs the tracing subscriber on first use.
    pub fn new(sources: MockTopicSources, relations: MockRelationSource) -> Self {
        init_tracing(&Settings::default());
        Self {
            sources: Arc::new(sources),
            relations: Arc::new(relations),
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn pipeline(&self) -> MockPipeline {
        TopicGraphPipeline::new(
            Arc::clone(&self.sources),
            Arc::clone(&self.relations),
            &self.settings,
        )
    }
}

/// Sources for the climate corpus used across the tests.
///
/// Climate mentions Policy (a topic) and Reef (only a related entity);
/// Policy has no strict aggregation.
pub fn climate_sources() -> MockTopicSources {
    MockTopicSources::default()
        .with_topics(vec![
            topic_hit("topic:climate", "Climate", &["Klima"]),
            topic_hit("topic:policy", "Policy", &[]),
        ])
        .with_authors(vec![entity("person:ada", "Ada")])
        .with_alt_count("Klima", 11)
        .with_strict(
            "topic:climate",
            aggregation(
                42,
                &[("person:ada", 7), ("person:unknown", 2)],
                &[(1_577_836_800_000, 3), (1_609_459_200_000, 5)],
                &[
                    ("topic:policy", 5),
                    ("topic:reef", 3),
                    ("place:arctic", 4),
                    ("event:cop21", 2),
                ],
            ),
        )
        .with_loose("Climate", aggregation(120, &[], &[], &[]))
        .with_locations(vec![entity("place:arctic", "Arctic")])
        .with_related_topics(vec![
            entity("topic:policy", "Policy"),
            entity("topic:reef", "Reef"),
        ])
        .with_events(vec![entity("event:cop21", "COP21")])
}

/// Relation matrix matching [`climate_sources`].
pub fn climate_relations() -> MockRelationSource {
    MockRelationSource::new(relation_rows(&[
        ("Climate", 42),
        ("Climate&Policy", 5),
        ("Policy", 9),
        ("Policy&Climate", 5),
    ]))
}

/// Write a TOML config file into a temp dir and return both.
pub fn write_config(contents: &str) -> anyhow::Result<(tempfile::TempDir, String)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents)?;
    Ok((dir, path.to_string_lossy().into_owned()))
}
