//! Path - a node-repetition-free walk through the graph.

use serde::{Deserialize, Serialize};

use super::{Node, Relationship};

/// Weight contributed by a relationship with no `weight` in its payload.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// A path in the graph: node -[rel]-> node -[rel]-> node ...
///
/// `weight` is the sum of the relationships' `weight` payload values, where a
/// missing weight counts as [`DEFAULT_EDGE_WEIGHT`]. An unweighted path
/// therefore weighs exactly its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    /// Nodes along the path. Always has one more element than `relationships`.
    pub nodes: Vec<Node>,
    /// Relationships connecting consecutive nodes.
    pub relationships: Vec<Relationship>,
    pub length: usize,
    pub weight: f64,
}

impl Path {
    /// A zero-length path holding a single node.
    pub fn single(node: Node) -> Self {
        Self {
            nodes: vec![node],
            relationships: Vec::new(),
            length: 0,
            weight: 0.0,
        }
    }

    pub fn from_parts(nodes: Vec<Node>, relationships: Vec<Relationship>) -> Self {
        let weight = relationships
            .iter()
            .map(|r| r.weight().unwrap_or(DEFAULT_EDGE_WEIGHT))
            .sum();
        Self {
            length: relationships.len(),
            nodes,
            relationships,
            weight,
        }
    }

    pub fn start(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn end(&self) -> Option<&Node> {
        self.nodes.last()
    }

    /// True when no node appears twice.
    pub fn is_simple(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.nodes.iter().all(|n| seen.insert(n.id))
    }
}

/// Every path with the minimum node count. Ties are all returned, in input order.
pub fn shortest_paths(paths: &[Path]) -> Vec<&Path> {
    let Some(min) = paths.iter().map(|p| p.nodes.len()).min() else {
        return Vec::new();
    };
    paths.iter().filter(|p| p.nodes.len() == min).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{NodeType, RelationshipType};
    use chrono::Utc;
    use serde_json::json;

    fn scene(title: &str) -> Node {
        Node::new(
            NodeType::Scene,
            json!({ "title": title }).as_object().cloned().unwrap(),
            Utc::now(),
        )
        .unwrap()
    }

    fn leads_to(from: &Node, to: &Node, payload: serde_json::Value) -> Relationship {
        Relationship::connect(
            RelationshipType::LeadsTo,
            from,
            to,
            payload.as_object().cloned().unwrap(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn weight_sums_with_default() {
        let (a, b, c) = (scene("a"), scene("b"), scene("c"));
        let ab = leads_to(&a, &b, json!({ "weight": 2.5 }));
        let bc = leads_to(&b, &c, json!({}));
        let path = Path::from_parts(vec![a, b, c], vec![ab, bc]);
        assert_eq!(path.length, 2);
        assert!((path.weight - 3.5).abs() < f64::EPSILON);
        assert!(path.is_simple());
    }

    #[test]
    fn single_node_path() {
        let a = scene("a");
        let path = Path::single(a.clone());
        assert_eq!(path.length, 0);
        assert_eq!(path.start(), Some(&a));
        assert_eq!(path.end(), Some(&a));
    }

    #[test]
    fn shortest_returns_all_ties() {
        let (a, b, d) = (scene("a"), scene("b"), scene("d"));
        let long = Path::from_parts(
            vec![a.clone(), b.clone(), d.clone()],
            vec![leads_to(&a, &b, json!({})), leads_to(&b, &d, json!({}))],
        );
        let short_1 = Path::from_parts(vec![a.clone(), d.clone()], vec![leads_to(&a, &d, json!({}))]);
        let short_2 = Path::from_parts(vec![a.clone(), d.clone()], vec![leads_to(&a, &d, json!({}))]);

        let paths = vec![long, short_1.clone(), short_2.clone()];
        let shortest = shortest_paths(&paths);
        assert_eq!(shortest, vec![&short_1, &short_2]);
        assert!(shortest_paths(&[]).is_empty());
    }
}
