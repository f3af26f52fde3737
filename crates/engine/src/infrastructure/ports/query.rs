//! The query-execution port.
//!
//! Repositories and the graph engine describe what they need as a
//! [`GraphQuery`]; each executor translates it to its own backend. Results
//! come back as row-oriented [`Record`]s keyed by column name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use storygraph_domain::{
    Direction, Node, NodeId, NodeType, Payload, Relationship, RelationshipId, RelationshipType,
};

use super::error::QueryError;

/// One result row: column name to JSON value.
pub type Record = serde_json::Map<String, Value>;

/// Named parameters for a raw query.
pub type Params = serde_json::Map<String, Value>;

/// Column names shared by every executor.
pub mod columns {
    pub const NODE: &str = "node";
    pub const RELATIONSHIP: &str = "relationship";
    pub const ORIGIN: &str = "origin";
    pub const DIRECTION: &str = "direction";
    pub const DEGREE: &str = "degree";
    pub const DELETED: &str = "deleted";
    pub const TYPE: &str = "type";
    pub const COUNT: &str = "count";
    pub const ID: &str = "id";
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
    pub const FROM_TYPE: &str = "fromType";
    pub const TO_TYPE: &str = "toType";
}

/// A request to the graph backend.
///
/// Row shapes per request:
///
/// | request | columns |
/// |---|---|
/// | `FetchNodes`, `ListNodes`, `CreateNode`, `UpdateNode`, `UnconnectedNodes` | `node` |
/// | `DeleteNodeIfDetached` | `degree`, `deleted` (no row when the node is absent) |
/// | `FetchRelationship`, `CreateRelationship`, `UpdateRelationship` | `relationship` |
/// | `DeleteRelationship` | `deleted` (count) |
/// | `Expand` | `origin`, `relationship`, `node`, `direction` |
/// | `CountNodesByType`, `CountRelationshipsByType` | `type`, `count` |
/// | `EdgesOfTypes` | `id`, `from`, `to` |
/// | `RelationshipSignatures` | `id`, `type`, `fromType`, `toType` |
#[derive(Debug, Clone, PartialEq)]
pub enum GraphQuery {
    /// Caller-supplied query text, passed to the backend unchanged.
    Raw { text: String, parameters: Params },

    FetchNodes { ids: Vec<NodeId> },
    ListNodes {
        node_type: Option<NodeType>,
        limit: u32,
        offset: u32,
    },
    CreateNode { node: Node },
    UpdateNode {
        id: NodeId,
        payload: Payload,
        updated_at: DateTime<Utc>,
    },
    /// Delete the node only when it has no relationships. The degree check
    /// and the delete are one atomic unit.
    DeleteNodeIfDetached { id: NodeId },

    FetchRelationship { id: RelationshipId },
    /// Insert the edge only when both endpoints exist, checked atomically
    /// with the insert. No row when an endpoint is absent.
    CreateRelationship { relationship: Relationship },
    UpdateRelationship {
        id: RelationshipId,
        payload: Payload,
        updated_at: DateTime<Utc>,
    },
    DeleteRelationship { id: RelationshipId },

    /// Every relationship incident to any of `node_ids` in `direction`,
    /// with the node at the far end.
    Expand {
        node_ids: Vec<NodeId>,
        direction: Direction,
        relationship_types: Option<Vec<RelationshipType>>,
    },
    CountNodesByType,
    CountRelationshipsByType,
    EdgesOfTypes { types: Vec<RelationshipType> },
    UnconnectedNodes,
    RelationshipSignatures,
}

impl GraphQuery {
    /// Short operation name for logs and error context.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Raw { .. } => "raw",
            Self::FetchNodes { .. } => "fetch_nodes",
            Self::ListNodes { .. } => "list_nodes",
            Self::CreateNode { .. } => "create_node",
            Self::UpdateNode { .. } => "update_node",
            Self::DeleteNodeIfDetached { .. } => "delete_node_if_detached",
            Self::FetchRelationship { .. } => "fetch_relationship",
            Self::CreateRelationship { .. } => "create_relationship",
            Self::UpdateRelationship { .. } => "update_relationship",
            Self::DeleteRelationship { .. } => "delete_relationship",
            Self::Expand { .. } => "expand",
            Self::CountNodesByType => "count_nodes_by_type",
            Self::CountRelationshipsByType => "count_relationships_by_type",
            Self::EdgesOfTypes { .. } => "edges_of_types",
            Self::UnconnectedNodes => "unconnected_nodes",
            Self::RelationshipSignatures => "relationship_signatures",
        }
    }
}

/// Runs one query against the backing store, in exactly one round trip.
///
/// No caching, retries or timeouts happen at this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, query: GraphQuery) -> Result<Vec<Record>, QueryError>;

    /// Short backend name for health output.
    fn backend(&self) -> &'static str;
}

/// Typed access to record columns.
pub trait RecordExt {
    /// Deserialize a required column.
    fn decode<T: DeserializeOwned>(&self, column: &str) -> Result<T, QueryError>;
}

impl RecordExt for Record {
    fn decode<T: DeserializeOwned>(&self, column: &str) -> Result<T, QueryError> {
        let value = self
            .get(column)
            .ok_or_else(|| QueryError::decode(format!("missing column '{}'", column)))?;
        T::deserialize(value)
            .map_err(|e| QueryError::decode(format!("column '{}': {}", column, e)))
    }
}

/// Build a record from `(column, value)` pairs.
pub fn record<const N: usize>(pairs: [(&str, Value); N]) -> Record {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Serialize an entity into a column value.
pub fn encode<T: Serialize>(value: &T) -> Result<Value, QueryError> {
    serde_json::to_value(value).map_err(QueryError::decode)
}
