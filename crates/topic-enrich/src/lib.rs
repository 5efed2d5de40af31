//! # topic-enrich
//!
//! Multi-source enrichment of topic search hits.
//!
//! A pass fans out to every data source (topic hits, author candidates,
//! alternate-name counts, strict and loose resource aggregations, locations,
//! related topics, events), waits for all of them, and merges the results into
//! one [`Topic`](topic_types::Topic) per hit.
//!
//! ## Modules
//!
//! - [`resolver`]: aggregation bucket keys to entity records
//! - [`convert`]: raw aggregations to topic metadata
//! - [`sources`]: the source trait and a mock for tests
//! - [`enricher`]: the all-or-nothing join and per-hit merge
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use topic_enrich::{TopicEnricher, MockTopicSources};
//!
//! let enricher = TopicEnricher::new(Arc::new(MockTopicSources::default()));
//! let topics = enricher.enrich().await?;
//! ```

pub mod convert;
pub mod enricher;
pub mod error;
pub mod resolver;
pub mod sources;

pub use convert::{bucket_year, convert_aggregation};
pub use enricher::{merge_topics, TopicEnricher};
pub use error::{EnrichError, SourceError};
pub use resolver::resolve_entities;
pub use sources::{MockTopicSources, SourceKind, SourceSnapshot, TopicSources};
