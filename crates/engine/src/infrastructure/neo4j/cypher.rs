//! Cypher text for each structured request.
//!
//! Nodes are stored as `(:GraphNode:<Type> {id, type, payload, created_at, updated_at})`
//! and relationships as `[:<TYPE> {id, payload, created_at, updated_at}]`.
//! Labels and relationship types come from the closed catalogue, so they are
//! interpolated into the text; everything else is a parameter.

use neo4rs::{query, Query};

use storygraph_domain::{Direction, Node, NodeId, NodeType, Payload, Relationship, RelationshipType};

use super::convert::{node_projection, payload_json, relationship_projection};
use crate::infrastructure::ports::QueryError;

fn ids(ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

/// `[r]` or `[r:A|B]`.
fn rel_pattern(var: &str, types: Option<&[RelationshipType]>) -> String {
    match types {
        Some(types) if !types.is_empty() => {
            let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
            format!("[{var}:{}]", names.join("|"))
        }
        _ => format!("[{var}]"),
    }
}

pub(super) fn fetch_nodes(node_ids: &[NodeId]) -> Query {
    query(&format!(
        "UNWIND $ids AS node_id
         MATCH (n:GraphNode {{id: node_id}})
         RETURN {} AS node",
        node_projection("n")
    ))
    .param("ids", ids(node_ids))
}

pub(super) fn list_nodes(node_type: Option<NodeType>, limit: u32, offset: u32) -> Query {
    let label = node_type.map(|t| format!(":{}", t.as_str())).unwrap_or_default();
    query(&format!(
        "MATCH (n:GraphNode{label})
         RETURN {} AS node
         ORDER BY n.created_at, n.id
         SKIP $offset LIMIT $limit",
        node_projection("n")
    ))
    .param("offset", i64::from(offset))
    .param("limit", i64::from(limit))
}

pub(super) fn create_node(node: &Node) -> Result<Query, QueryError> {
    Ok(query(&format!(
        "CREATE (n:GraphNode:{} {{id: $id, type: $type, payload: $payload,
                                   created_at: $created_at, updated_at: $updated_at}})
         RETURN {} AS node",
        node.node_type.as_str(),
        node_projection("n")
    ))
    .param("id", node.id.to_string())
    .param("type", node.node_type.as_str())
    .param("payload", payload_json(&node.payload)?)
    .param("created_at", node.created_at.to_rfc3339())
    .param("updated_at", node.updated_at.to_rfc3339()))
}

pub(super) fn update_node(
    id: NodeId,
    payload: &Payload,
    updated_at: chrono::DateTime<chrono::Utc>,
) -> Result<Query, QueryError> {
    Ok(query(&format!(
        "MATCH (n:GraphNode {{id: $id}})
         SET n.payload = $payload, n.updated_at = $updated_at
         RETURN {} AS node",
        node_projection("n")
    ))
    .param("id", id.to_string())
    .param("payload", payload_json(payload)?)
    .param("updated_at", updated_at.to_rfc3339()))
}

/// First half of the detached delete. Setting a property takes the node's
/// write lock, which relationship creation also needs.
pub(super) fn lock_and_count_degree(id: NodeId) -> Query {
    query(
        "MATCH (n:GraphNode {id: $id})
         SET n.delete_guard = true
         WITH n
         OPTIONAL MATCH (n)-[r]-()
         RETURN n.id AS id, count(DISTINCT r) AS degree",
    )
    .param("id", id.to_string())
}

pub(super) fn delete_node(id: NodeId) -> Query {
    query("MATCH (n:GraphNode {id: $id}) DELETE n").param("id", id.to_string())
}

pub(super) fn fetch_relationship(id: storygraph_domain::RelationshipId) -> Query {
    query(&format!(
        "MATCH (:GraphNode)-[r {{id: $id}}]->(:GraphNode)
         RETURN {} AS relationship",
        relationship_projection("r")
    ))
    .param("id", id.to_string())
}

pub(super) fn create_relationship(rel: &Relationship) -> Result<Query, QueryError> {
    Ok(query(&format!(
        "MATCH (a:GraphNode {{id: $from}}), (b:GraphNode {{id: $to}})
         CREATE (a)-[r:{} {{id: $id, payload: $payload,
                            created_at: $created_at, updated_at: $updated_at}}]->(b)
         RETURN {} AS relationship",
        rel.relationship_type.as_str(),
        relationship_projection("r")
    ))
    .param("from", rel.from_node_id.to_string())
    .param("to", rel.to_node_id.to_string())
    .param("id", rel.id.to_string())
    .param("payload", payload_json(&rel.payload)?)
    .param("created_at", rel.created_at.to_rfc3339())
    .param("updated_at", rel.updated_at.to_rfc3339()))
}

pub(super) fn update_relationship(
    id: storygraph_domain::RelationshipId,
    payload: &Payload,
    updated_at: chrono::DateTime<chrono::Utc>,
) -> Result<Query, QueryError> {
    Ok(query(&format!(
        "MATCH (:GraphNode)-[r {{id: $id}}]->(:GraphNode)
         SET r.payload = $payload, r.updated_at = $updated_at
         RETURN {} AS relationship",
        relationship_projection("r")
    ))
    .param("id", id.to_string())
    .param("payload", payload_json(payload)?)
    .param("updated_at", updated_at.to_rfc3339()))
}

pub(super) fn delete_relationship(id: storygraph_domain::RelationshipId) -> Query {
    query(
        "MATCH (:GraphNode)-[r {id: $id}]->(:GraphNode)
         DELETE r
         RETURN count(r) AS deleted",
    )
    .param("id", id.to_string())
}

fn expand_branch(direction: Direction, rel: &str) -> String {
    let (left, right) = match direction {
        Direction::Incoming => ("<-", "-"),
        _ => ("-", "->"),
    };
    format!(
        "UNWIND $ids AS origin_id
         MATCH (o:GraphNode {{id: origin_id}}){left}{rel}{right}(n:GraphNode)
         RETURN origin_id AS origin, {} AS relationship, {} AS node, '{}' AS direction",
        relationship_projection("r"),
        node_projection("n"),
        direction.as_str()
    )
}

pub(super) fn expand(
    node_ids: &[NodeId],
    direction: Direction,
    types: Option<&[RelationshipType]>,
) -> Query {
    let rel = rel_pattern("r", types);
    let text = match direction {
        Direction::Both => format!(
            "{}\nUNION ALL\n{}",
            expand_branch(Direction::Outgoing, &rel),
            expand_branch(Direction::Incoming, &rel)
        ),
        one_way => expand_branch(one_way, &rel),
    };
    query(&text).param("ids", ids(node_ids))
}

pub(super) fn count_nodes_by_type() -> Query {
    query("MATCH (n:GraphNode) RETURN n.type AS type, count(n) AS count")
}

pub(super) fn count_relationships_by_type() -> Query {
    query("MATCH (:GraphNode)-[r]->(:GraphNode) RETURN type(r) AS type, count(r) AS count")
}

pub(super) fn edges_of_types(types: &[RelationshipType]) -> Query {
    query(&format!(
        "MATCH (a:GraphNode)-{}->(b:GraphNode)
         RETURN r.id AS id, a.id AS from, b.id AS to",
        rel_pattern("r", Some(types))
    ))
}

pub(super) fn unconnected_nodes() -> Query {
    query(&format!(
        "MATCH (n:GraphNode)
         WHERE NOT (n)--()
         RETURN {} AS node
         ORDER BY n.created_at, n.id",
        node_projection("n")
    ))
}

pub(super) fn relationship_signatures() -> Query {
    query(
        "MATCH (a:GraphNode)-[r]->(b:GraphNode)
         RETURN r.id AS id, type(r) AS type, a.type AS fromType, b.type AS toType",
    )
}
