//! Graph structures handed to the renderer.

use serde::{Deserialize, Serialize};

use crate::error::TopicError;
use crate::topic::Topic;

/// Kind of graph node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A directly queried topic
    #[serde(rename = "PRIMARY_NODE")]
    Primary,
    /// Inferred from being referenced; has no fetched document
    #[serde(rename = "SECONDARY_NODE")]
    Secondary,
    /// Reserved for author nodes; not produced by the builder
    #[serde(rename = "AUTHOR_NODE")]
    Author,
}

impl NodeKind {
    /// Precedence rank used when two nodes claim the same id.
    pub fn rank(&self) -> u8 {
        match self {
            NodeKind::Primary => 2,
            NodeKind::Author => 1,
            NodeKind::Secondary => 0,
        }
    }
}

/// How a link was derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// From a topic's resolved related-topic mapping
    #[serde(rename = "MENTIONS_ID_LINK")]
    MentionsId,
    /// From the name co-occurrence table
    #[serde(rename = "MENTIONS_NAME_LINK")]
    MentionsName,
    /// Reserved; not produced by the builder
    #[serde(rename = "topicAuthor")]
    TopicAuthor,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::MentionsId => write!(f, "mentions-id"),
            LinkKind::MentionsName => write!(f, "mentions-name"),
            LinkKind::TopicAuthor => write!(f, "topic-author"),
        }
    }
}

/// A node in the topic graph. `id` is the display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Backing topic document, present for primary nodes
    pub doc: Option<Topic>,
    pub count: Option<u64>,
    pub text: String,
}

impl GraphNode {
    /// Primary node for a queried topic.
    pub fn primary(topic: &Topic) -> Self {
        Self {
            id: topic.name.clone(),
            kind: NodeKind::Primary,
            count: topic.loose_count(),
            doc: Some(topic.clone()),
            text: topic.name.clone(),
        }
    }

    /// Secondary placeholder with no document and no count.
    pub fn placeholder(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            kind: NodeKind::Secondary,
            doc: None,
            count: None,
            text: name,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.kind == NodeKind::Primary
    }
}

/// A weighted link between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub weight: u64,
}

impl GraphLink {
    /// Create a link; the id is derived from the endpoints.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: LinkKind,
        weight: u64,
    ) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}-{}", source, target),
            source,
            target,
            kind,
            weight,
        }
    }
}

/// Node/link graph for visualization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Links from `source` to `target`, in emission order.
    pub fn links_between<'a>(
        &'a self,
        source: &'a str,
        target: &'a str,
    ) -> impl Iterator<Item = &'a GraphLink> {
        self.links
            .iter()
            .filter(move |l| l.source == source && l.target == target)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Encode for the renderer.
    pub fn to_json(&self) -> Result<String, TopicError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_id_from_endpoints() {
        let link = GraphLink::new("Climate", "Policy", LinkKind::MentionsId, 5);
        assert_eq!(link.id, "Climate-Policy");
    }

    #[test]
    fn test_primary_node_from_topic() {
        let topic = Topic::new("t-1", "Climate");
        let node = GraphNode::primary(&topic);
        assert_eq!(node.id, "Climate");
        assert_eq!(node.text, "Climate");
        assert!(node.is_primary());
        assert_eq!(node.count, None);
        assert!(node.doc.is_some());
    }

    #[test]
    fn test_placeholder_node() {
        let node = GraphNode::placeholder("Reef");
        assert_eq!(node.kind, NodeKind::Secondary);
        assert!(node.doc.is_none());
        assert!(node.count.is_none());
    }

    #[test]
    fn test_kind_rank_orders_primary_first() {
        assert!(NodeKind::Primary.rank() > NodeKind::Secondary.rank());
        assert!(NodeKind::Author.rank() > NodeKind::Secondary.rank());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&NodeKind::Primary).unwrap();
        assert_eq!(json, "\"PRIMARY_NODE\"");
        let json = serde_json::to_string(&LinkKind::MentionsName).unwrap();
        assert_eq!(json, "\"MENTIONS_NAME_LINK\"");
    }

    #[test]
    fn test_graph_to_json() {
        let graph = Graph {
            nodes: vec![GraphNode::placeholder("Reef")],
            links: vec![GraphLink::new("Ocean", "Reef", LinkKind::MentionsId, 3)],
        };
        let value: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
        assert_eq!(value["nodes"][0]["type"], "SECONDARY_NODE");
        assert_eq!(value["links"][0]["id"], "Ocean-Reef");
        assert_eq!(value["links"][0]["weight"], 3);
    }
}
