//! Simple-path enumeration between two nodes.

use storygraph_domain::{Direction, NodeId, Path, RelationshipType, Subgraph, MAX_TRAVERSAL_DEPTH};

use super::{type_filter, GraphEngine};
use crate::infrastructure::ports::GraphError;

impl GraphEngine {
    /// Every simple path of at most `max_depth` hops from `from` to `to`,
    /// following relationship direction.
    ///
    /// The reachable subgraph is loaded one level per round trip and the
    /// paths are enumerated in memory, shortest first. No path is an empty
    /// result; `from == to` is a single zero-length path.
    pub async fn find_paths(
        &self,
        from: NodeId,
        to: NodeId,
        max_depth: usize,
        relationship_types: Option<Vec<RelationshipType>>,
    ) -> Result<Vec<Path>, GraphError> {
        if !(1..=MAX_TRAVERSAL_DEPTH).contains(&max_depth) {
            return Err(GraphError::validation(format!(
                "maxDepth: must be between 1 and {}",
                MAX_TRAVERSAL_DEPTH
            )));
        }

        let Some(start) = self.fetch_node(from).await? else {
            return Ok(Vec::new());
        };

        let mut subgraph = Subgraph::new();
        subgraph.insert_node(start);

        if from != to {
            let relationship_types = type_filter(relationship_types);
            let mut frontier = vec![from];

            // Paths end at `to`, so its outgoing edges are never needed.
            for _ in 0..max_depth {
                frontier.retain(|id| *id != to);
                if frontier.is_empty() {
                    break;
                }
                let rows = self
                    .expand(
                        std::mem::take(&mut frontier),
                        Direction::Outgoing,
                        relationship_types.clone(),
                    )
                    .await?;

                for row in rows {
                    let far = row.node.id;
                    if !subgraph.contains_node(far) {
                        subgraph.insert_node(row.node);
                        frontier.push(far);
                    }
                    subgraph.insert_relationship(row.relationship);
                }
            }
        }

        let paths = subgraph.simple_paths(from, to, max_depth);
        tracing::debug!(
            from = %from,
            to = %to,
            max_depth,
            paths = paths.len(),
            "Path search complete"
        );
        Ok(paths)
    }
}
