//! Graph engine use cases.
//!
//! Read-only analysis over the query executor: bounded traversal, simple-path
//! enumeration, neighbor lookup, statistics and structural validation. The
//! engine keeps no state between calls; every answer is recomputed from the
//! backend.

mod neighbors;
mod paths;
mod statistics;
mod traversal;
mod validation;

use std::sync::Arc;

use serde::Deserialize;

use storygraph_domain::{Direction, Node, NodeId, Relationship, RelationshipType};

use crate::infrastructure::ports::{
    columns, GraphError, GraphQuery, QueryError, QueryExecutor, Record, RecordExt,
};

pub use traversal::TraverseRequest;

/// Traversal, path finding, neighbor lookup, statistics and validation.
pub struct GraphEngine {
    executor: Arc<dyn QueryExecutor>,
}

/// One `Expand` row: an edge touching the frontier and the node at its far end.
#[derive(Debug, Deserialize)]
struct ExpandRow {
    relationship: Relationship,
    node: Node,
    direction: Direction,
}

impl ExpandRow {
    fn from_record(record: Record) -> Result<Self, GraphError> {
        serde_json::from_value(serde_json::Value::Object(record))
            .map_err(|e| GraphError::from(QueryError::decode(format!("expand row: {}", e))))
    }
}

/// An empty filter list means "no filter".
fn type_filter(types: Option<Vec<RelationshipType>>) -> Option<Vec<RelationshipType>> {
    types.filter(|t| !t.is_empty())
}

impl GraphEngine {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    async fn fetch_node(&self, id: NodeId) -> Result<Option<Node>, GraphError> {
        let rows = self
            .executor
            .execute(GraphQuery::FetchNodes { ids: vec![id] })
            .await?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.decode(columns::NODE)?)),
            None => Ok(None),
        }
    }

    /// One hop from every node in `frontier`, in a single round trip.
    async fn expand(
        &self,
        frontier: Vec<NodeId>,
        direction: Direction,
        relationship_types: Option<Vec<RelationshipType>>,
    ) -> Result<Vec<ExpandRow>, GraphError> {
        if frontier.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self
            .executor
            .execute(GraphQuery::Expand {
                node_ids: frontier,
                direction,
                relationship_types,
            })
            .await?;
        rows.into_iter().map(ExpandRow::from_record).collect()
    }
}
