//! Bounded breadth-first traversal.

use std::collections::HashSet;

use storygraph_domain::{
    Direction, NodeId, NodeType, RelationshipType, TraversalResult, MAX_TRAVERSAL_DEPTH,
};

use super::{type_filter, GraphEngine};
use crate::infrastructure::ports::GraphError;

/// Parameters for [`GraphEngine::traverse`].
#[derive(Debug, Clone, PartialEq)]
pub struct TraverseRequest {
    pub start_node_id: NodeId,
    pub max_depth: usize,
    pub relationship_types: Option<Vec<RelationshipType>>,
    pub node_types: Option<Vec<NodeType>>,
    pub direction: Direction,
}

impl TraverseRequest {
    pub fn new(start_node_id: NodeId, max_depth: usize) -> Self {
        Self {
            start_node_id,
            max_depth,
            relationship_types: None,
            node_types: None,
            direction: Direction::Both,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_relationship_types(mut self, types: Vec<RelationshipType>) -> Self {
        self.relationship_types = Some(types);
        self
    }

    pub fn with_node_types(mut self, types: Vec<NodeType>) -> Self {
        self.node_types = Some(types);
        self
    }
}

impl GraphEngine {
    /// Breadth-first expansion from the start node, one backend round trip
    /// per level.
    ///
    /// A node whose type is excluded by `node_types` is pruned together with
    /// the edge that reached it. The start node is always included. A missing
    /// start node gives an empty result.
    pub async fn traverse(&self, request: TraverseRequest) -> Result<TraversalResult, GraphError> {
        if request.max_depth > MAX_TRAVERSAL_DEPTH {
            return Err(GraphError::validation(format!(
                "maxDepth: must be between 0 and {}",
                MAX_TRAVERSAL_DEPTH
            )));
        }

        let Some(start) = self.fetch_node(request.start_node_id).await? else {
            return Ok(TraversalResult::default());
        };

        let relationship_types = type_filter(request.relationship_types);
        let node_types = request.node_types.filter(|t| !t.is_empty());

        let mut seen_nodes = HashSet::from([start.id]);
        let mut seen_relationships = HashSet::new();
        let mut result = TraversalResult {
            nodes: vec![start],
            relationships: Vec::new(),
        };
        let mut frontier = vec![request.start_node_id];

        for _ in 0..request.max_depth {
            if frontier.is_empty() {
                break;
            }
            let rows = self
                .expand(
                    std::mem::take(&mut frontier),
                    request.direction,
                    relationship_types.clone(),
                )
                .await?;

            for row in rows {
                if let Some(allowed) = &node_types {
                    if !allowed.contains(&row.node.node_type) {
                        continue;
                    }
                }
                if seen_relationships.insert(row.relationship.id) {
                    result.relationships.push(row.relationship);
                }
                if seen_nodes.insert(row.node.id) {
                    frontier.push(row.node.id);
                    result.nodes.push(row.node);
                }
            }
        }

        tracing::debug!(
            start_node_id = %request.start_node_id,
            max_depth = request.max_depth,
            direction = %request.direction,
            nodes = result.nodes.len(),
            relationships = result.relationships.len(),
            "Traversal complete"
        );
        Ok(result)
    }
}
