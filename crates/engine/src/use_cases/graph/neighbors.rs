//! Single-hop neighbor lookup.

use std::collections::HashSet;

use storygraph_domain::{Direction, NeighborRecord, NodeId, RelationshipType};

use super::{type_filter, GraphEngine};
use crate::infrastructure::ports::GraphError;

impl GraphEngine {
    /// Nodes one hop away, with the relationship that connects them.
    ///
    /// Each relationship yields one record, so a self loop under
    /// [`Direction::Both`] is reported once (as outgoing).
    pub async fn get_node_neighbors(
        &self,
        node_id: NodeId,
        direction: Direction,
        relationship_types: Option<Vec<RelationshipType>>,
    ) -> Result<Vec<NeighborRecord>, GraphError> {
        let rows = self
            .expand(vec![node_id], direction, type_filter(relationship_types))
            .await?;

        let mut seen = HashSet::new();
        Ok(rows
            .into_iter()
            .filter(|row| seen.insert(row.relationship.id))
            .map(|row| NeighborRecord {
                node: row.node,
                relationship: row.relationship,
                direction: row.direction,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::GraphFixture;
    use storygraph_domain::RelationshipId;

    fn relationship_ids(records: &[NeighborRecord]) -> HashSet<RelationshipId> {
        records.iter().map(|r| r.relationship.id).collect()
    }

    #[tokio::test]
    async fn both_is_the_union_of_incoming_and_outgoing() {
        let f = GraphFixture::new();
        let hub = f.scene("Hub").await;
        let before = f.scene("Before").await;
        let after = f.scene("After").await;
        let mira = f.character("Mira").await;
        f.connect(RelationshipType::LeadsTo, &before, &hub).await;
        f.connect(RelationshipType::LeadsTo, &hub, &after).await;
        f.connect(RelationshipType::AppearsIn, &mira, &hub).await;

        let incoming = f
            .engine
            .get_node_neighbors(hub.id, Direction::Incoming, None)
            .await
            .unwrap();
        let outgoing = f
            .engine
            .get_node_neighbors(hub.id, Direction::Outgoing, None)
            .await
            .unwrap();
        let both = f
            .engine
            .get_node_neighbors(hub.id, Direction::Both, None)
            .await
            .unwrap();

        assert_eq!(incoming.len(), 2);
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].node.id, after.id);
        assert_eq!(outgoing[0].direction, Direction::Outgoing);

        let union: HashSet<_> = relationship_ids(&incoming)
            .union(&relationship_ids(&outgoing))
            .copied()
            .collect();
        assert_eq!(both.len(), union.len());
        assert_eq!(relationship_ids(&both), union);
    }

    #[tokio::test]
    async fn self_loop_is_counted_once() {
        let f = GraphFixture::new();
        let hall = f
            .node(
                storygraph_domain::NodeType::Location,
                serde_json::json!({"name": "Hall of Mirrors"}),
            )
            .await;
        let rel = f.connect(RelationshipType::Contains, &hall, &hall).await;

        let both = f
            .engine
            .get_node_neighbors(hall.id, Direction::Both, None)
            .await
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].relationship.id, rel.id);
        assert_eq!(both[0].node.id, hall.id);
    }

    #[tokio::test]
    async fn filters_by_type_and_tolerates_missing_node() {
        let f = GraphFixture::new();
        let hub = f.scene("Hub").await;
        let after = f.scene("After").await;
        let mira = f.character("Mira").await;
        f.connect(RelationshipType::LeadsTo, &hub, &after).await;
        f.connect(RelationshipType::AppearsIn, &mira, &hub).await;

        let appearances = f
            .engine
            .get_node_neighbors(hub.id, Direction::Both, Some(vec![RelationshipType::AppearsIn]))
            .await
            .unwrap();
        assert_eq!(appearances.len(), 1);
        assert_eq!(appearances[0].node.id, mira.id);
        assert_eq!(appearances[0].direction, Direction::Incoming);

        let none = f
            .engine
            .get_node_neighbors(NodeId::new(), Direction::Both, None)
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
