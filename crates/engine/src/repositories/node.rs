//! Node repository - typed CRUD over graph nodes.

use std::sync::Arc;

use storygraph_domain::{Node, NodeId, NodeType, Payload};

use crate::infrastructure::ports::{
    columns, ClockPort, GraphError, GraphQuery, QueryError, QueryExecutor, RecordExt,
};

/// Upper bound on a single listing page.
pub const MAX_LIST_LIMIT: u32 = 500;

/// Node CRUD. Every payload is validated against its type's schema before it
/// reaches the executor.
pub struct NodeRepository {
    executor: Arc<dyn QueryExecutor>,
    clock: Arc<dyn ClockPort>,
}

impl NodeRepository {
    pub fn new(executor: Arc<dyn QueryExecutor>, clock: Arc<dyn ClockPort>) -> Self {
        Self { executor, clock }
    }

    pub async fn create(&self, node_type: NodeType, payload: Payload) -> Result<Node, GraphError> {
        let node = Node::new(node_type, payload, self.clock.now())?;
        let rows = self.executor.execute(GraphQuery::CreateNode { node }).await?;
        let created: Node = rows
            .first()
            .ok_or_else(|| QueryError::decode("create_node returned no row"))?
            .decode(columns::NODE)?;

        tracing::info!(node_id = %created.id, node_type = %created.node_type, "Created node");
        Ok(created)
    }

    pub async fn get(&self, id: NodeId) -> Result<Option<Node>, GraphError> {
        let rows = self
            .executor
            .execute(GraphQuery::FetchNodes { ids: vec![id] })
            .await?;
        match rows.first() {
            Some(row) => Ok(Some(row.decode(columns::NODE)?)),
            None => Ok(None),
        }
    }

    /// List nodes, optionally of one type. `limit` is clamped to 1..=500.
    pub async fn list(
        &self,
        node_type: Option<NodeType>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Node>, GraphError> {
        let rows = self
            .executor
            .execute(GraphQuery::ListNodes {
                node_type,
                limit: limit.clamp(1, MAX_LIST_LIMIT),
                offset,
            })
            .await?;
        rows.iter()
            .map(|row| row.decode(columns::NODE).map_err(GraphError::from))
            .collect()
    }

    /// Shallow-merge `patch` onto the stored payload and re-validate.
    ///
    /// A `null` in the patch removes that field.
    pub async fn update(&self, id: NodeId, patch: Payload) -> Result<Node, GraphError> {
        let mut node = self
            .get(id)
            .await?
            .ok_or_else(|| GraphError::not_found("Node", id))?;

        node.apply_patch(&patch, self.clock.now())?;

        let rows = self
            .executor
            .execute(GraphQuery::UpdateNode {
                id,
                payload: node.payload.clone(),
                updated_at: node.updated_at,
            })
            .await?;
        // Deleted between the read and the write.
        let row = rows.first().ok_or_else(|| GraphError::not_found("Node", id))?;
        Ok(row.decode(columns::NODE)?)
    }

    /// Delete a node that has no relationships.
    pub async fn delete(&self, id: NodeId) -> Result<(), GraphError> {
        let rows = self
            .executor
            .execute(GraphQuery::DeleteNodeIfDetached { id })
            .await?;
        let row = rows.first().ok_or_else(|| GraphError::not_found("Node", id))?;

        if row.decode::<bool>(columns::DELETED)? {
            tracing::info!(node_id = %id, "Deleted node");
            return Ok(());
        }
        let degree: u64 = row.decode(columns::DEGREE)?;
        Err(GraphError::constraint(format!(
            "Node {} still has {} relationship(s); delete them first",
            id, degree
        )))
    }
}
