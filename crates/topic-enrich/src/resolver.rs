//! Resolution of aggregation bucket keys into entity records.
//!
//! Aggregations over the resource index only carry entity identities. The
//! entity documents themselves are fetched separately; this module joins the
//! two. Buckets whose key has no matching candidate are dropped, which is the
//! expected outcome for references to deleted or unindexed entities.

use std::collections::HashMap;

use tracing::trace;

use topic_types::{Entity, EntityCounts, ResourceAggResponse, TermAggregation};

/// Resolve the buckets of `name` in `aggs` against `candidates`.
///
/// Returns `None` when `aggs` is `None` so callers can tell a missing
/// aggregation apart from one that resolved to no entities. When several
/// candidates share an identity the first one wins.
pub fn resolve_entities<T>(
    aggs: Option<&ResourceAggResponse>,
    candidates: &[T],
    name: TermAggregation,
) -> Option<EntityCounts<T>>
where
    T: Entity + Clone,
{
    let aggs = aggs?;

    let mut index: HashMap<&str, &T> = HashMap::with_capacity(candidates.len());
    for candidate in candidates {
        index.entry(candidate.entity_id()).or_insert(candidate);
    }

    let mut resolved = EntityCounts::new();
    for bucket in aggs.term_buckets(name) {
        match index.get(bucket.key.as_str()) {
            Some(entity) => resolved.insert((*entity).clone(), bucket.doc_count),
            None => trace!(aggregation = %name, key = %bucket.key, "Dropping unmatched bucket"),
        }
    }

    Some(resolved)
}
