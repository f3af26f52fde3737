//! Relationship repository - typed CRUD over edges.

use std::sync::Arc;

use storygraph_domain::{
    validate_relationship_payload, NodeId, Payload, Relationship, RelationshipId, RelationshipType,
};

use crate::infrastructure::ports::{
    columns, ClockPort, GraphError, GraphQuery, QueryError, QueryExecutor, RecordExt,
};

use super::NodeRepository;

/// Edge CRUD. Creation checks the payload, both endpoints and the
/// compatibility table before anything is written.
pub struct RelationshipRepository {
    executor: Arc<dyn QueryExecutor>,
    clock: Arc<dyn ClockPort>,
    nodes: Arc<NodeRepository>,
}

impl RelationshipRepository {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        clock: Arc<dyn ClockPort>,
        nodes: Arc<NodeRepository>,
    ) -> Self {
        Self {
            executor,
            clock,
            nodes,
        }
    }

    pub async fn create(
        &self,
        relationship_type: RelationshipType,
        from: NodeId,
        to: NodeId,
        payload: Payload,
    ) -> Result<Relationship, GraphError> {
        validate_relationship_payload(relationship_type, &payload)?;

        let from_node = self.nodes.get(from).await?.ok_or_else(|| {
            GraphError::constraint(format!("Source node {} does not exist", from))
        })?;
        let to_node = self.nodes.get(to).await?.ok_or_else(|| {
            GraphError::constraint(format!("Target node {} does not exist", to))
        })?;

        let relationship = Relationship::connect(
            relationship_type,
            &from_node,
            &to_node,
            payload,
            self.clock.now(),
        )?;

        let rows = self
            .executor
            .execute(GraphQuery::CreateRelationship { relationship })
            .await?;
        // An endpoint vanished after the lookup.
        let row = rows.first().ok_or_else(|| {
            GraphError::constraint(format!(
                "Endpoint of {} {} -> {} no longer exists",
                relationship_type, from, to
            ))
        })?;
        let created: Relationship = row.decode(columns::RELATIONSHIP)?;

        tracing::info!(
            relationship_id = %created.id,
            relationship_type = %created.relationship_type,
            from = %created.from_node_id,
            to = %created.to_node_id,
            "Created relationship"
        );
        Ok(created)
    }

    pub async fn get(&self, id: RelationshipId) -> Result<Option<Relationship>, GraphError> {
        let rows = self
            .executor
            .execute(GraphQuery::FetchRelationship { id })
            .await?;
        match rows.first() {
            Some(row) => Ok(Some(row.decode(columns::RELATIONSHIP)?)),
            None => Ok(None),
        }
    }

    /// Shallow-merge `patch` onto the stored payload and re-validate.
    pub async fn update(
        &self,
        id: RelationshipId,
        patch: Payload,
    ) -> Result<Relationship, GraphError> {
        let mut relationship = self
            .get(id)
            .await?
            .ok_or_else(|| GraphError::not_found("Relationship", id))?;

        relationship.apply_patch(&patch, self.clock.now())?;

        let rows = self
            .executor
            .execute(GraphQuery::UpdateRelationship {
                id,
                payload: relationship.payload.clone(),
                updated_at: relationship.updated_at,
            })
            .await?;
        let row = rows
            .first()
            .ok_or_else(|| GraphError::not_found("Relationship", id))?;
        Ok(row.decode(columns::RELATIONSHIP)?)
    }

    pub async fn delete(&self, id: RelationshipId) -> Result<(), GraphError> {
        let rows = self
            .executor
            .execute(GraphQuery::DeleteRelationship { id })
            .await?;
        let deleted: u64 = rows
            .first()
            .ok_or_else(|| QueryError::decode("delete_relationship returned no row"))?
            .decode(columns::DELETED)?;

        if deleted == 0 {
            return Err(GraphError::not_found("Relationship", id));
        }
        tracing::info!(relationship_id = %id, "Deleted relationship");
        Ok(())
    }
}
