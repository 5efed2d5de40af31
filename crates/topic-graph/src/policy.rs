//! Merge rules for nodes and links that share an identity.

use std::collections::HashMap;

use topic_types::{GraphLink, GraphNode, LinkDedupPolicy};

/// Outcome of offering a node for an id that is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    KeepExisting,
    Replace,
}

/// Decide which of two nodes with the same id survives.
///
/// The node with the higher kind rank wins (primary over secondary); on a tie
/// the existing node is kept.
pub fn resolve_node(existing: &GraphNode, candidate: &GraphNode) -> MergeDecision {
    if candidate.kind.rank() > existing.kind.rank() {
        MergeDecision::Replace
    } else {
        MergeDecision::KeepExisting
    }
}

/// Collapse links sharing a (source, target) pair according to `policy`.
///
/// Returns the surviving links in first-emission order and the number removed.
pub fn dedup_links(links: Vec<GraphLink>, policy: LinkDedupPolicy) -> (Vec<GraphLink>, usize) {
    if policy == LinkDedupPolicy::KeepAll {
        return (links, 0);
    }

    let before = links.len();
    let mut seen: HashMap<(String, String), usize> = HashMap::new();
    let mut kept: Vec<GraphLink> = Vec::with_capacity(links.len());

    for link in links {
        let key = (link.source.clone(), link.target.clone());
        match seen.get(&key) {
            Some(&pos) => {
                if policy == LinkDedupPolicy::MaxWeight && link.weight > kept[pos].weight {
                    kept[pos].weight = link.weight;
                }
            }
            None => {
                seen.insert(key, kept.len());
                kept.push(link);
            }
        }
    }

    let removed = before - kept.len();
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use topic_types::{LinkKind, NodeKind, Topic};

    #[test]
    fn test_primary_replaces_secondary() {
        let secondary = GraphNode::placeholder("Policy");
        let primary = GraphNode::primary(&Topic::new("t-2", "Policy"));
        assert_eq!(resolve_node(&secondary, &primary), MergeDecision::Replace);
        assert_eq!(resolve_node(&primary, &secondary), MergeDecision::KeepExisting);
    }

    #[test]
    fn test_tie_keeps_existing() {
        let a = GraphNode::primary(&Topic::new("t-1", "Policy"));
        let b = GraphNode::primary(&Topic::new("t-9", "Policy"));
        assert_eq!(resolve_node(&a, &b), MergeDecision::KeepExisting);

        let s1 = GraphNode::placeholder("Reef");
        let s2 = GraphNode::placeholder("Reef");
        assert_eq!(resolve_node(&s1, &s2), MergeDecision::KeepExisting);
    }

    #[test]
    fn test_author_kind_outranks_secondary() {
        let mut author = GraphNode::placeholder("Ada");
        author.kind = NodeKind::Author;
        let secondary = GraphNode::placeholder("Ada");
        assert_eq!(resolve_node(&secondary, &author), MergeDecision::Replace);
    }

    fn sample_links() -> Vec<GraphLink> {
        vec![
            GraphLink::new("Climate", "Policy", LinkKind::MentionsId, 5),
            GraphLink::new("Climate", "Reef", LinkKind::MentionsId, 1),
            GraphLink::new("Climate", "Policy", LinkKind::MentionsName, 8),
            GraphLink::new("Policy", "Climate", LinkKind::MentionsName, 2),
        ]
    }

    #[test]
    fn test_keep_all_is_identity() {
        let (links, removed) = dedup_links(sample_links(), LinkDedupPolicy::KeepAll);
        assert_eq!(links, sample_links());
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_keep_first_prefers_id_link() {
        let (links, removed) = dedup_links(sample_links(), LinkDedupPolicy::KeepFirst);
        assert_eq!(removed, 1);
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].kind, LinkKind::MentionsId);
        assert_eq!(links[0].weight, 5);
    }

    #[test]
    fn test_max_weight_keeps_position_and_takes_largest() {
        let (links, removed) = dedup_links(sample_links(), LinkDedupPolicy::MaxWeight);
        assert_eq!(removed, 1);
        assert_eq!(links[0].kind, LinkKind::MentionsId);
        assert_eq!(links[0].weight, 8);
    }

    #[test]
    fn test_direction_matters() {
        let (links, _) = dedup_links(sample_links(), LinkDedupPolicy::KeepFirst);
        assert!(links
            .iter()
            .any(|l| l.source == "Policy" && l.target == "Climate"));
    }
}
