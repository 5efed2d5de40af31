//! Graph construction from enriched topics and the relation matrix.
//!
//! Node ids are display names. Every queried topic becomes a primary node;
//! names that are only referenced (as a related topic or in the relation
//! matrix) become secondary placeholders. When two nodes claim one id,
//! [`resolve_node`] decides which survives, so primary precedence does not
//! depend on processing order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use topic_graph::GraphBuilder;
//!
//! let graph = GraphBuilder::new().build(&topics, &relations);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use topic_types::{
    Entity, Graph, GraphLink, GraphNode, GraphSettings, LinkDedupPolicy, LinkKind, NodeKind,
    RelationRow, Topic,
};

use crate::policy::{dedup_links, resolve_node, MergeDecision};
use crate::relation::RelationCell;

/// What happened while building one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub primary_nodes: usize,
    pub secondary_nodes: usize,
    /// Relation endpoints that matched no topic or related name
    pub orphan_endpoints: Vec<String>,
    pub skipped_diagonal: usize,
    pub skipped_malformed: usize,
    /// Links removed by the dedup policy
    pub links_deduplicated: usize,
}

impl BuildReport {
    /// True if the relation matrix referenced names nothing else produced.
    pub fn has_orphans(&self) -> bool {
        !self.orphan_endpoints.is_empty()
    }
}

/// Nodes unique by id, in first-seen order.
#[derive(Debug, Default)]
struct NodeSet {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
}

impl NodeSet {
    fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Offer a node. A taken id keeps its position; `resolve_node` picks
    /// which node occupies it.
    fn offer(&mut self, candidate: GraphNode) {
        match self.index.get(&candidate.id) {
            Some(&pos) => {
                if resolve_node(&self.nodes[pos], &candidate) == MergeDecision::Replace {
                    debug!(id = %candidate.id, kind = ?candidate.kind, "Replacing node");
                    self.nodes[pos] = candidate;
                }
            }
            None => {
                self.index.insert(candidate.id.clone(), self.nodes.len());
                self.nodes.push(candidate);
            }
        }
    }

    fn into_nodes(self) -> Vec<GraphNode> {
        self.nodes
    }
}

/// Builds the topic graph.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    link_dedup: LinkDedupPolicy,
}

impl GraphBuilder {
    /// Create a builder that keeps every emitted link.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &GraphSettings) -> Self {
        Self {
            link_dedup: settings.link_dedup,
        }
    }

    /// Set how duplicate links between the same endpoints are collapsed.
    pub fn with_link_dedup(mut self, policy: LinkDedupPolicy) -> Self {
        self.link_dedup = policy;
        self
    }

    pub fn link_dedup(&self) -> LinkDedupPolicy {
        self.link_dedup
    }

    /// Build the graph.
    pub fn build(&self, topics: &[Topic], relations: &[RelationRow]) -> Graph {
        self.build_with_report(topics, relations).0
    }

    /// Build the graph and report placeholders, skipped cells and orphans.
    #[instrument(skip(self, topics, relations), fields(topics = topics.len(), relations = relations.len()))]
    pub fn build_with_report(
        &self,
        topics: &[Topic],
        relations: &[RelationRow],
    ) -> (Graph, BuildReport) {
        let mut report = BuildReport::default();
        let mut nodes = NodeSet::default();
        let mut links: Vec<GraphLink> = Vec::new();
        let mut related_names: Vec<&str> = Vec::new();

        // Top-level topics and their id-derived links
        for topic in topics {
            nodes.offer(GraphNode::primary(topic));

            for (related, weight) in topic.related.iter() {
                let name = related.display_name();
                related_names.push(name);
                links.push(GraphLink::new(&topic.name, name, LinkKind::MentionsId, weight));
            }
        }

        // Placeholders for related names that are not topics themselves
        for name in related_names {
            if !nodes.contains(name) {
                nodes.offer(GraphNode::placeholder(name));
            }
        }

        for row in relations {
            match RelationCell::parse(&row.key) {
                RelationCell::Diagonal(_) => report.skipped_diagonal += 1,
                RelationCell::Malformed => {
                    warn!(key = %row.key, "Skipping relation with empty source");
                    report.skipped_malformed += 1;
                }
                RelationCell::Pair { source, target } => {
                    for endpoint in [source, target] {
                        if !nodes.contains(endpoint) {
                            warn!(
                                name = %endpoint,
                                key = %row.key,
                                "Relation endpoint matches no topic, adding placeholder"
                            );
                            report.orphan_endpoints.push(endpoint.to_string());
                            nodes.offer(GraphNode::placeholder(endpoint));
                        }
                    }
                    links.push(GraphLink::new(
                        source,
                        target,
                        LinkKind::MentionsName,
                        row.doc_count,
                    ));
                }
            }
        }

        let (links, removed) = dedup_links(links, self.link_dedup);
        report.links_deduplicated = removed;

        let nodes = nodes.into_nodes();
        report.primary_nodes = nodes.iter().filter(|n| n.kind == NodeKind::Primary).count();
        report.secondary_nodes = nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Secondary)
            .count();

        info!(
            nodes = nodes.len(),
            links = links.len(),
            secondary = report.secondary_nodes,
            orphans = report.orphan_endpoints.len(),
            "Graph built"
        );

        (Graph { nodes, links }, report)
    }
}
