//! Enriched topic records.

use serde::{Deserialize, Serialize};

use crate::search::{Entity, EntityRecord, TermBucket};

/// Number of resources published in a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
}

/// A term mentioned in associated resources, counted by document frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub name: String,
    pub doc_count: u64,
}

/// Normalized view of the resources associated with a topic.
///
/// `doc_count` is the index hit total; the histograms are top-K and need not
/// sum to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAggregation {
    /// Total matching resources
    pub doc_count: u64,
    /// Author buckets as returned by the index, unresolved
    pub top_authors: Vec<TermBucket>,
    /// One entry per date bucket; equal years are not merged
    pub date_published: Vec<YearCount>,
    pub mentions: Vec<Mention>,
}

/// Lightweight classification reference on a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalType {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// An entity paired with the number of resources that reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCount<T> {
    pub entity: T,
    pub count: u64,
}

/// Ordered mapping from resolved entity to count, unique by entity identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityCounts<T> {
    entries: Vec<EntityCount<T>>,
}

impl<T> Default for EntityCounts<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> EntityCounts<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(entity, count)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, u64)> {
        self.entries.iter().map(|e| (&e.entity, e.count))
    }

    pub fn entities(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.entity)
    }
}

impl<T: Entity> EntityCounts<T> {
    /// Insert an entity. An identity already present keeps its position and
    /// takes the new count.
    pub fn insert(&mut self, entity: T, count: u64) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.entity.entity_id() == entity.entity_id())
        {
            Some(existing) => existing.count = count,
            None => self.entries.push(EntityCount { entity, count }),
        }
    }

    /// Count recorded for the entity with the given identity.
    pub fn get(&self, entity_id: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.entity.entity_id() == entity_id)
            .map(|e| e.count)
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.get(entity_id).is_some()
    }
}

impl<T: Entity> FromIterator<(T, u64)> for EntityCounts<T> {
    fn from_iter<I: IntoIterator<Item = (T, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (entity, count) in iter {
            counts.insert(entity, count);
        }
        counts
    }
}

/// A topic search hit merged with everything fetched about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Index document id
    pub id: String,
    /// Preferred name, also the graph identity
    pub name: String,
    /// First alternate name, if any
    pub alternate_name: Option<String>,
    pub description: Option<String>,
    /// Relevance score from the topic search
    pub score: f64,
    pub additional_types: Vec<AdditionalType>,
    /// Aggregation over resources matching the topic identity
    pub aggregations: Option<ResourceAggregation>,
    /// Aggregation over resources matching the topic name
    pub aggregations_loose: Option<ResourceAggregation>,
    /// Hit total for the alternate name
    pub alt_count: Option<u64>,
    pub authors: EntityCounts<EntityRecord>,
    pub locations: EntityCounts<EntityRecord>,
    pub related: EntityCounts<EntityRecord>,
    pub events: EntityCounts<EntityRecord>,
}

impl Topic {
    /// Create a bare topic with no fetched data attached.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            alternate_name: None,
            description: None,
            score: 0.0,
            additional_types: Vec::new(),
            aggregations: None,
            aggregations_loose: None,
            alt_count: None,
            authors: EntityCounts::new(),
            locations: EntityCounts::new(),
            related: EntityCounts::new(),
            events: EntityCounts::new(),
        }
    }

    /// Display names of related topics, in mapping order.
    pub fn related_names(&self) -> impl Iterator<Item = &str> {
        self.related.entities().map(|e| e.display_name())
    }

    /// Total resource count under the loose (name-based) match.
    pub fn loose_count(&self) -> Option<u64> {
        self.aggregations_loose.as_ref().map(|a| a.doc_count)
    }
}
