//! Relationship entity - a typed, directed edge between two nodes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalogue::{check_compatibility, RelationshipType};
use crate::error::DomainError;
use crate::ids::{NodeId, RelationshipId};
use crate::schema::{merge_payload, validate_relationship_payload, Payload};

use super::Node;

/// A typed, directed edge carrying its own payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: RelationshipId,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub from_node_id: NodeId,
    pub to_node_id: NodeId,
    #[serde(default)]
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Relationship {
    /// Build a relationship between two existing nodes.
    ///
    /// Payload violations are reported first (all of them), then the
    /// `(type, fromType, toType)` triple is checked against the compatibility
    /// table.
    pub fn connect(
        relationship_type: RelationshipType,
        from: &Node,
        to: &Node,
        payload: Payload,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_relationship_payload(relationship_type, &payload)?;
        check_compatibility(relationship_type, from.node_type, to.node_type)?;
        Ok(Self {
            id: RelationshipId::new(),
            relationship_type,
            from_node_id: from.id,
            to_node_id: to.id,
            payload,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merge a partial payload and re-validate. On error nothing changes.
    pub fn apply_patch(&mut self, patch: &Payload, now: DateTime<Utc>) -> Result<(), DomainError> {
        let merged = merge_payload(&self.payload, patch);
        validate_relationship_payload(self.relationship_type, &merged)?;
        self.payload = merged;
        self.updated_at = now;
        Ok(())
    }

    /// The `weight` payload value, if present and numeric.
    pub fn weight(&self) -> Option<f64> {
        self.payload.get("weight").and_then(|v| v.as_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::NodeType;
    use serde_json::json;

    fn node(node_type: NodeType, payload: serde_json::Value) -> Node {
        Node::new(node_type, payload.as_object().cloned().unwrap(), Utc::now()).unwrap()
    }

    #[test]
    fn connect_checks_payload_then_compatibility() {
        let hero = node(NodeType::Character, json!({"name": "Ada"}));
        let scene = node(NodeType::Scene, json!({"title": "Dock"}));
        let place = node(NodeType::Location, json!({"name": "Harbor"}));

        let rel = Relationship::connect(
            RelationshipType::AppearsIn,
            &hero,
            &scene,
            json!({"role": "major"}).as_object().cloned().unwrap(),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(rel.from_node_id, hero.id);
        assert_eq!(rel.to_node_id, scene.id);

        let bad_payload = Relationship::connect(
            RelationshipType::AppearsIn,
            &hero,
            &place,
            json!({"role": "villain"}).as_object().cloned().unwrap(),
            Utc::now(),
        );
        assert!(matches!(bad_payload, Err(DomainError::Validation(_))));

        let bad_pair = Relationship::connect(
            RelationshipType::AppearsIn,
            &hero,
            &place,
            Payload::new(),
            Utc::now(),
        );
        assert!(matches!(bad_pair, Err(DomainError::Constraint(_))));
    }

    #[test]
    fn weight_follows_payload_patches() {
        let a = node(NodeType::Scene, json!({"title": "A"}));
        let mut rel = Relationship::connect(
            RelationshipType::LeadsTo,
            &a,
            &a,
            Payload::new(),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(rel.weight(), None);

        rel.apply_patch(json!({"weight": 2.5}).as_object().unwrap(), Utc::now())
            .unwrap();
        assert_eq!(rel.weight(), Some(2.5));
    }
}
