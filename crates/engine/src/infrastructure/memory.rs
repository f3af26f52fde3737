//! In-memory graph executor.
//!
//! Implements every structured [`GraphQuery`] over process memory. Used by the
//! test suites and by `GRAPH_BACKEND=memory` for offline runs. Raw query text
//! has no interpreter here and is rejected.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;

use storygraph_domain::{Direction, Node, NodeId, Relationship, RelationshipId, RelationshipType};

use crate::infrastructure::ports::{
    columns, encode, record, GraphQuery, QueryError, QueryExecutor, Record,
};

/// A stored node with its insertion sequence and incident relationship count.
struct Entry {
    node: Node,
    seq: u64,
    degree: usize,
}

#[derive(Default)]
struct GraphState {
    nodes: HashMap<NodeId, Entry>,
    /// Insertion sequence to node id, so listings are stable.
    order: BTreeMap<u64, NodeId>,
    next_seq: u64,
    relationships: Vec<Relationship>,
}

impl GraphState {
    fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id).map(|e| &e.node)
    }

    fn ordered(&self) -> impl Iterator<Item = &Entry> {
        self.order.values().filter_map(|id| self.nodes.get(id))
    }

    fn degree(&self, id: NodeId) -> usize {
        self.nodes.get(&id).map_or(0, |e| e.degree)
    }

    fn insert_node(&mut self, node: Node) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, node.id);
        self.nodes.insert(
            node.id,
            Entry {
                node,
                seq,
                degree: 0,
            },
        );
    }

    fn remove_node(&mut self, id: NodeId) {
        if let Some(entry) = self.nodes.remove(&id) {
            self.order.remove(&entry.seq);
        }
    }

    /// Adjust the degree of both endpoints. A self loop counts once.
    fn touch_endpoints(&mut self, rel: &Relationship, add: bool) {
        let mut ends = vec![rel.from_node_id];
        if rel.to_node_id != rel.from_node_id {
            ends.push(rel.to_node_id);
        }
        for id in ends {
            if let Some(entry) = self.nodes.get_mut(&id) {
                entry.degree = if add {
                    entry.degree + 1
                } else {
                    entry.degree.saturating_sub(1)
                };
            }
        }
    }

    fn insert_relationship(&mut self, rel: Relationship) {
        self.touch_endpoints(&rel, true);
        self.relationships.push(rel);
    }

    fn remove_relationship(&mut self, id: RelationshipId) -> usize {
        let Some(pos) = self.relationships.iter().position(|r| r.id == id) else {
            return 0;
        };
        let rel = self.relationships.remove(pos);
        self.touch_endpoints(&rel, false);
        1
    }
}

/// Process-local graph guarded by a single `RwLock`.
///
/// Every request takes the lock once, so each request is atomic.
#[derive(Default)]
pub struct InMemoryGraph {
    state: RwLock<GraphState>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    async fn run(&self, query: GraphQuery) -> Result<Vec<Record>, QueryError> {
        match query {
            GraphQuery::Raw { .. } => Err(QueryError::Unsupported(
                "the in-memory graph does not interpret raw query text".to_string(),
            )),

            GraphQuery::FetchNodes { ids } => {
                let state = self.state.read().await;
                ids.iter()
                    .filter_map(|id| state.node(id))
                    .map(node_row)
                    .collect()
            }

            GraphQuery::ListNodes {
                node_type,
                limit,
                offset,
            } => {
                let state = self.state.read().await;
                state
                    .ordered()
                    .map(|e| &e.node)
                    .filter(|n| node_type.map_or(true, |t| n.node_type == t))
                    .skip(offset as usize)
                    .take(limit as usize)
                    .map(node_row)
                    .collect()
            }

            GraphQuery::CreateNode { node } => {
                let mut state = self.state.write().await;
                if state.nodes.contains_key(&node.id) {
                    return Err(QueryError::backend(
                        "create_node",
                        format!("node {} already exists", node.id),
                    ));
                }
                let row = node_row(&node)?;
                state.insert_node(node);
                Ok(vec![row])
            }

            GraphQuery::UpdateNode {
                id,
                payload,
                updated_at,
            } => {
                let mut state = self.state.write().await;
                let Some(node) = state.nodes.get_mut(&id).map(|e| &mut e.node) else {
                    return Ok(Vec::new());
                };
                node.payload = payload;
                node.updated_at = updated_at;
                Ok(vec![node_row(node)?])
            }

            GraphQuery::DeleteNodeIfDetached { id } => {
                let mut state = self.state.write().await;
                if !state.nodes.contains_key(&id) {
                    return Ok(Vec::new());
                }
                let degree = state.degree(id);
                let deleted = degree == 0;
                if deleted {
                    state.remove_node(id);
                }
                Ok(vec![record([
                    (columns::DEGREE, json!(degree)),
                    (columns::DELETED, json!(deleted)),
                ])])
            }

            GraphQuery::FetchRelationship { id } => {
                let state = self.state.read().await;
                state
                    .relationships
                    .iter()
                    .filter(|r| r.id == id)
                    .map(relationship_row)
                    .collect()
            }

            GraphQuery::CreateRelationship { relationship } => {
                let mut state = self.state.write().await;
                let endpoints_exist = state.nodes.contains_key(&relationship.from_node_id)
                    && state.nodes.contains_key(&relationship.to_node_id);
                if !endpoints_exist {
                    return Ok(Vec::new());
                }
                let row = relationship_row(&relationship)?;
                state.insert_relationship(relationship);
                Ok(vec![row])
            }

            GraphQuery::UpdateRelationship {
                id,
                payload,
                updated_at,
            } => {
                let mut state = self.state.write().await;
                let Some(rel) = state.relationships.iter_mut().find(|r| r.id == id) else {
                    return Ok(Vec::new());
                };
                rel.payload = payload;
                rel.updated_at = updated_at;
                Ok(vec![relationship_row(rel)?])
            }

            GraphQuery::DeleteRelationship { id } => {
                let mut state = self.state.write().await;
                let deleted = state.remove_relationship(id);
                Ok(vec![record([(columns::DELETED, json!(deleted))])])
            }

            GraphQuery::Expand {
                node_ids,
                direction,
                relationship_types,
            } => {
                let state = self.state.read().await;
                let mut rows = Vec::new();
                for origin in &node_ids {
                    for rel in &state.relationships {
                        if !type_allowed(&relationship_types, rel.relationship_type) {
                            continue;
                        }
                        let outgoing = matches!(direction, Direction::Outgoing | Direction::Both)
                            && rel.from_node_id == *origin;
                        let incoming = matches!(direction, Direction::Incoming | Direction::Both)
                            && rel.to_node_id == *origin;

                        for (matched, far, dir) in [
                            (outgoing, rel.to_node_id, Direction::Outgoing),
                            (incoming, rel.from_node_id, Direction::Incoming),
                        ] {
                            if !matched {
                                continue;
                            }
                            let Some(node) = state.node(&far) else {
                                continue;
                            };
                            rows.push(record([
                                (columns::ORIGIN, json!(origin)),
                                (columns::RELATIONSHIP, encode(rel)?),
                                (columns::NODE, encode(node)?),
                                (columns::DIRECTION, json!(dir)),
                            ]));
                        }
                    }
                }
                Ok(rows)
            }

            GraphQuery::CountNodesByType => {
                let state = self.state.read().await;
                let mut counts = BTreeMap::new();
                for entry in state.nodes.values() {
                    *counts.entry(entry.node.node_type.as_str()).or_insert(0) += 1;
                }
                Ok(count_rows(counts))
            }

            GraphQuery::CountRelationshipsByType => {
                let state = self.state.read().await;
                let mut counts = BTreeMap::new();
                for rel in &state.relationships {
                    *counts.entry(rel.relationship_type.as_str()).or_insert(0) += 1;
                }
                Ok(count_rows(counts))
            }

            GraphQuery::EdgesOfTypes { types } => {
                let state = self.state.read().await;
                Ok(state
                    .relationships
                    .iter()
                    .filter(|r| types.contains(&r.relationship_type))
                    .map(|r| {
                        record([
                            (columns::ID, json!(r.id)),
                            (columns::FROM, json!(r.from_node_id)),
                            (columns::TO, json!(r.to_node_id)),
                        ])
                    })
                    .collect())
            }

            GraphQuery::UnconnectedNodes => {
                let state = self.state.read().await;
                state
                    .ordered()
                    .filter(|e| e.degree == 0)
                    .map(|e| node_row(&e.node))
                    .collect()
            }

            GraphQuery::RelationshipSignatures => {
                let state = self.state.read().await;
                Ok(state
                    .relationships
                    .iter()
                    .filter_map(|r| {
                        let from = state.node(&r.from_node_id)?;
                        let to = state.node(&r.to_node_id)?;
                        Some(record([
                            (columns::ID, json!(r.id)),
                            (columns::TYPE, json!(r.relationship_type)),
                            (columns::FROM_TYPE, json!(from.node_type)),
                            (columns::TO_TYPE, json!(to.node_type)),
                        ]))
                    })
                    .collect())
            }
        }
    }
}

fn node_row(node: &Node) -> Result<Record, QueryError> {
    Ok(record([(columns::NODE, encode(node)?)]))
}

fn relationship_row(relationship: &Relationship) -> Result<Record, QueryError> {
    Ok(record([(columns::RELATIONSHIP, encode(relationship)?)]))
}

fn count_rows(counts: BTreeMap<&'static str, u64>) -> Vec<Record> {
    counts
        .into_iter()
        .map(|(t, n)| record([(columns::TYPE, json!(t)), (columns::COUNT, json!(n))]))
        .collect()
}

fn type_allowed(types: &Option<Vec<RelationshipType>>, t: RelationshipType) -> bool {
    types.as_ref().map_or(true, |allowed| allowed.contains(&t))
}

#[async_trait]
impl QueryExecutor for InMemoryGraph {
    async fn execute(&self, query: GraphQuery) -> Result<Vec<Record>, QueryError> {
        let operation = query.operation();
        let result = self.run(query).await;

        match &result {
            Ok(rows) => tracing::debug!(operation, rows = rows.len(), "Executed graph query"),
            Err(e) => tracing::debug!(operation, error = %e, "Graph query failed"),
        }
        result
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Value of a JSON column as a string, for row assertions in tests.
#[cfg(test)]
pub(crate) fn column_str<'a>(row: &'a Record, column: &str) -> Option<&'a str> {
    row.get(column).and_then(serde_json::Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{Params, RecordExt};
    use chrono::Utc;
    use serde_json::Value;
    use storygraph_domain::{NodeType, Payload};

    fn node(node_type: NodeType, payload: Value) -> Node {
        Node::new(node_type, payload.as_object().cloned().unwrap(), Utc::now()).unwrap()
    }

    fn edge(rt: RelationshipType, from: &Node, to: &Node) -> Relationship {
        Relationship::connect(rt, from, to, Payload::new(), Utc::now()).unwrap()
    }

    async fn seeded(nodes: &[&Node], rels: &[&Relationship]) -> InMemoryGraph {
        let graph = InMemoryGraph::new();
        for n in nodes {
            graph
                .execute(GraphQuery::CreateNode { node: (*n).clone() })
                .await
                .unwrap();
        }
        for r in rels {
            let rows = graph
                .execute(GraphQuery::CreateRelationship {
                    relationship: (*r).clone(),
                })
                .await
                .unwrap();
            assert_eq!(rows.len(), 1);
        }
        graph
    }

    #[tokio::test]
    async fn raw_queries_are_unsupported() {
        let graph = InMemoryGraph::new();
        let result = graph
            .execute(GraphQuery::Raw {
                text: "MATCH (n) RETURN n".into(),
                parameters: Params::new(),
            })
            .await;
        assert!(matches!(result, Err(QueryError::Unsupported(_))));
    }

    #[tokio::test]
    async fn create_relationship_requires_both_endpoints() {
        let a = node(NodeType::Scene, json!({"title": "A"}));
        let b = node(NodeType::Scene, json!({"title": "B"}));
        let graph = seeded(&[&a], &[]).await;

        let rows = graph
            .execute(GraphQuery::CreateRelationship {
                relationship: edge(RelationshipType::LeadsTo, &a, &b),
            })
            .await
            .unwrap();
        assert!(rows.is_empty());

        let counts = graph
            .execute(GraphQuery::CountRelationshipsByType)
            .await
            .unwrap();
        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn delete_if_detached_checks_degree() {
        let a = node(NodeType::Scene, json!({"title": "A"}));
        let b = node(NodeType::Scene, json!({"title": "B"}));
        let ab = edge(RelationshipType::LeadsTo, &a, &b);
        let graph = seeded(&[&a, &b], &[&ab]).await;

        let rows = graph
            .execute(GraphQuery::DeleteNodeIfDetached { id: a.id })
            .await
            .unwrap();
        assert_eq!(rows[0].decode::<u64>(columns::DEGREE).unwrap(), 1);
        assert!(!rows[0].decode::<bool>(columns::DELETED).unwrap());

        graph
            .execute(GraphQuery::DeleteRelationship { id: ab.id })
            .await
            .unwrap();
        let rows = graph
            .execute(GraphQuery::DeleteNodeIfDetached { id: a.id })
            .await
            .unwrap();
        assert!(rows[0].decode::<bool>(columns::DELETED).unwrap());

        let rows = graph
            .execute(GraphQuery::DeleteNodeIfDetached { id: a.id })
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn unconnected_nodes_track_relationship_churn() {
        let a = node(NodeType::Scene, json!({"title": "A"}));
        let b = node(NodeType::Scene, json!({"title": "B"}));
        let c = node(NodeType::Scene, json!({"title": "C"}));
        let ab = edge(RelationshipType::LeadsTo, &a, &b);
        let cc = edge(RelationshipType::RelatesTo, &c, &c);
        let graph = seeded(&[&a, &b, &c], &[&ab, &cc]).await;

        let unconnected = |rows: Vec<Record>| -> Vec<NodeId> {
            rows.iter()
                .map(|r| r.decode::<Node>(columns::NODE).unwrap().id)
                .collect()
        };

        let rows = graph.execute(GraphQuery::UnconnectedNodes).await.unwrap();
        assert!(rows.is_empty());

        graph
            .execute(GraphQuery::DeleteRelationship { id: ab.id })
            .await
            .unwrap();
        let rows = graph.execute(GraphQuery::UnconnectedNodes).await.unwrap();
        assert_eq!(unconnected(rows), vec![a.id, b.id]);

        // A self loop is one incident relationship.
        let rows = graph
            .execute(GraphQuery::DeleteNodeIfDetached { id: c.id })
            .await
            .unwrap();
        assert_eq!(rows[0].decode::<u64>(columns::DEGREE).unwrap(), 1);
        graph
            .execute(GraphQuery::DeleteRelationship { id: cc.id })
            .await
            .unwrap();
        let rows = graph
            .execute(GraphQuery::DeleteNodeIfDetached { id: c.id })
            .await
            .unwrap();
        assert!(rows[0].decode::<bool>(columns::DELETED).unwrap());

        let rows = graph
            .execute(GraphQuery::DeleteRelationship { id: cc.id })
            .await
            .unwrap();
        assert_eq!(rows[0].decode::<u64>(columns::DELETED).unwrap(), 0);

        let rows = graph
            .execute(GraphQuery::DeleteNodeIfDetached { id: a.id })
            .await
            .unwrap();
        assert!(rows[0].decode::<bool>(columns::DELETED).unwrap());
        let listed = graph
            .execute(GraphQuery::ListNodes {
                node_type: None,
                limit: 10,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(unconnected(listed), vec![b.id]);
    }

    #[tokio::test]
    async fn expand_reports_direction_relative_to_origin() {
        let a = node(NodeType::Scene, json!({"title": "A"}));
        let b = node(NodeType::Scene, json!({"title": "B"}));
        let ab = edge(RelationshipType::LeadsTo, &a, &b);
        let graph = seeded(&[&a, &b], &[&ab]).await;

        let rows = graph
            .execute(GraphQuery::Expand {
                node_ids: vec![b.id],
                direction: Direction::Both,
                relationship_types: None,
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(column_str(&rows[0], columns::DIRECTION), Some("incoming"));
        assert_eq!(rows[0].decode::<Node>(columns::NODE).unwrap().id, a.id);

        let filtered = graph
            .execute(GraphQuery::Expand {
                node_ids: vec![a.id],
                direction: Direction::Outgoing,
                relationship_types: Some(vec![RelationshipType::Triggers]),
            })
            .await
            .unwrap();
        assert!(filtered.is_empty());
    }

    #[tokio::test]
    async fn list_nodes_filters_and_pages_in_insertion_order() {
        let s1 = node(NodeType::Scene, json!({"title": "1"}));
        let c = node(NodeType::Character, json!({"name": "Ada"}));
        let s2 = node(NodeType::Scene, json!({"title": "2"}));
        let graph = seeded(&[&s1, &c, &s2], &[]).await;

        let rows = graph
            .execute(GraphQuery::ListNodes {
                node_type: Some(NodeType::Scene),
                limit: 10,
                offset: 1,
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].decode::<Node>(columns::NODE).unwrap().id, s2.id);
    }
}
