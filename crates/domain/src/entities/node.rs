//! Node entity - a typed vertex of the narrative graph
//!
//! Stored in Neo4j as `(:GraphNode:<Type> {id, type, payload, created_at, updated_at})`
//! with the payload serialized as a JSON string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalogue::NodeType;
use crate::error::DomainError;
use crate::ids::NodeId;
use crate::schema::{merge_payload, validate_node_payload, Payload};

/// A typed entity in the narrative graph.
///
/// Construction goes through [`Node::new`], which validates the payload
/// against the schema for `node_type`. Fields stay public because adapters
/// rebuild nodes from stored records that were validated on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Node {
    pub fn new(node_type: NodeType, payload: Payload, now: DateTime<Utc>) -> Result<Self, DomainError> {
        validate_node_payload(node_type, &payload)?;
        Ok(Self {
            id: NodeId::new(),
            node_type,
            payload,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merge a partial payload and re-validate the merged result.
    ///
    /// On error the node is left untouched.
    pub fn apply_patch(&mut self, patch: &Payload, now: DateTime<Utc>) -> Result<(), DomainError> {
        let merged = merge_payload(&self.payload, patch);
        validate_node_payload(self.node_type, &merged)?;
        self.payload = merged;
        self.updated_at = now;
        Ok(())
    }
}
