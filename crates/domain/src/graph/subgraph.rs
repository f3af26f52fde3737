//! In-memory slice of the graph used for simple-path enumeration.

use std::collections::{HashMap, HashSet};

use crate::entities::{Node, Path, Relationship};
use crate::ids::{NodeId, RelationshipId};

/// Nodes plus their outgoing relationships, as fetched from the backend.
///
/// Relationships keep insertion order so enumeration is deterministic for a
/// given fetch order.
#[derive(Debug, Default)]
pub struct Subgraph {
    nodes: HashMap<NodeId, Node>,
    outgoing: HashMap<NodeId, Vec<Relationship>>,
    relationship_ids: HashSet<RelationshipId>,
}

impl Subgraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_node(&mut self, node: Node) {
        self.nodes.entry(node.id).or_insert(node);
    }

    /// Returns false when the relationship was already present.
    pub fn insert_relationship(&mut self, relationship: Relationship) -> bool {
        if !self.relationship_ids.insert(relationship.id) {
            return false;
        }
        self.outgoing
            .entry(relationship.from_node_id)
            .or_default()
            .push(relationship);
        true
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Every simple path of 1..=`max_depth` hops from `from` to `to`,
    /// following relationship direction. Shorter paths come first; paths of
    /// equal length keep discovery order.
    ///
    /// `from == to` yields the single zero-length path when the node is known.
    pub fn simple_paths(&self, from: NodeId, to: NodeId, max_depth: usize) -> Vec<Path> {
        let Some(start) = self.nodes.get(&from) else {
            return Vec::new();
        };
        if from == to {
            return vec![Path::single(start.clone())];
        }

        let mut found = Vec::new();
        let mut nodes = vec![from];
        let mut relationships: Vec<&Relationship> = Vec::new();
        self.walk(to, max_depth, &mut nodes, &mut relationships, &mut found);

        found.sort_by_key(|p| p.length);
        found
    }

    fn walk<'a>(
        &'a self,
        target: NodeId,
        max_depth: usize,
        nodes: &mut Vec<NodeId>,
        relationships: &mut Vec<&'a Relationship>,
        found: &mut Vec<Path>,
    ) {
        let Some(&current) = nodes.last() else {
            return;
        };
        if current == target {
            found.push(self.materialize(nodes, relationships));
            return;
        }
        if relationships.len() >= max_depth {
            return;
        }

        let Some(edges) = self.outgoing.get(&current) else {
            return;
        };
        for rel in edges {
            let next = rel.to_node_id;
            if nodes.contains(&next) || !self.nodes.contains_key(&next) {
                continue;
            }
            nodes.push(next);
            relationships.push(rel);
            self.walk(target, max_depth, nodes, relationships, found);
            relationships.pop();
            nodes.pop();
        }
    }

    fn materialize(&self, nodes: &[NodeId], relationships: &[&Relationship]) -> Path {
        Path::from_parts(
            nodes
                .iter()
                .filter_map(|id| self.nodes.get(id).cloned())
                .collect(),
            relationships.iter().map(|r| (*r).clone()).collect(),
        )
    }
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

    fn edge(from: &Node, to: &Node) -> Relationship {
        Relationship::connect(
            RelationshipType::LeadsTo,
            from,
            to,
            Default::default(),
            Utc::now(),
        )
        .unwrap()
    }

    fn graph(nodes: &[&Node], edges: Vec<Relationship>) -> Subgraph {
        let mut g = Subgraph::new();
        for n in nodes {
            g.insert_node((*n).clone());
        }
        for e in edges {
            g.insert_relationship(e);
        }
        g
    }

    #[test]
    fn chain_has_single_path() {
        let (s1, s2, s3) = (scene("1"), scene("2"), scene("3"));
        let g = graph(&[&s1, &s2, &s3], vec![edge(&s1, &s2), edge(&s2, &s3)]);
        let paths = g.simple_paths(s1.id, s3.id, 5);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes.len(), 3);
        assert_eq!(paths[0].relationships.len(), 2);
    }

    #[test]
    fn respects_max_depth() {
        let (s1, s2, s3) = (scene("1"), scene("2"), scene("3"));
        let g = graph(&[&s1, &s2, &s3], vec![edge(&s1, &s2), edge(&s2, &s3)]);
        assert!(g.simple_paths(s1.id, s3.id, 1).is_empty());
    }

    #[test]
    fn never_repeats_a_node_in_cycles() {
        let (a, b, c) = (scene("a"), scene("b"), scene("c"));
        let g = graph(
            &[&a, &b, &c],
            vec![edge(&a, &b), edge(&b, &a), edge(&b, &c), edge(&a, &c)],
        );
        let paths = g.simple_paths(a.id, c.id, 10);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].length, 1);
        assert_eq!(paths[1].length, 2);
        for p in &paths {
            assert!(p.is_simple());
            assert_eq!(p.start().map(|n| n.id), Some(a.id));
            assert_eq!(p.end().map(|n| n.id), Some(c.id));
        }
    }

    #[test]
    fn same_endpoints_is_zero_length_path() {
        let a = scene("a");
        let g = graph(&[&a], vec![edge(&a, &a)]);
        let paths = g.simple_paths(a.id, a.id, 3);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].length, 0);
    }

    #[test]
    fn duplicate_relationships_are_ignored() {
        let (a, b) = (scene("a"), scene("b"));
        let ab = edge(&a, &b);
        let mut g = graph(&[&a, &b], vec![ab.clone()]);
        assert!(!g.insert_relationship(ab));
        assert_eq!(g.simple_paths(a.id, b.id, 2).len(), 1);
    }
}
