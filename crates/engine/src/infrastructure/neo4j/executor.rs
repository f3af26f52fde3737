//! Neo4j-backed [`QueryExecutor`].

use std::time::Instant;

use async_trait::async_trait;
use neo4rs::{query, BoltMap, Graph, Query, Row};
use serde_json::json;

use storygraph_domain::NodeId;

use super::convert::{node_from_map, relationship_from_map, to_bolt};
use super::cypher;
use crate::infrastructure::ports::{
    columns, encode, record, GraphQuery, Params, QueryError, QueryExecutor, Record,
};

/// Executes [`GraphQuery`] requests as Cypher over a `neo4rs::Graph`.
#[derive(Clone)]
pub struct Neo4jQueryExecutor {
    graph: Graph,
}

/// Sort a driver error into the executor taxonomy.
fn classify(operation: &'static str, e: neo4rs::Error) -> QueryError {
    let message = e.to_string();
    let lower = message.to_ascii_lowercase();
    if message.contains("Neo.ClientError.Statement") || lower.contains("syntax") {
        QueryError::Malformed(message)
    } else if lower.contains("connection") || lower.contains("io error") || lower.contains("broken pipe")
    {
        QueryError::Unavailable(message)
    } else {
        QueryError::backend(operation, message)
    }
}

fn column<T>(row: &Row, name: &str) -> Result<T, QueryError>
where
    T: serde::de::DeserializeOwned,
{
    row.get::<T>(name)
        .map_err(|e| QueryError::decode(format!("column '{}': {}", name, e)))
}

fn node_row(row: &Row) -> Result<Record, QueryError> {
    let node = node_from_map(&column::<BoltMap>(row, columns::NODE)?)?;
    Ok(record([(columns::NODE, encode(&node)?)]))
}

fn relationship_row(row: &Row) -> Result<Record, QueryError> {
    let rel = relationship_from_map(&column::<BoltMap>(row, columns::RELATIONSHIP)?)?;
    Ok(record([(columns::RELATIONSHIP, encode(&rel)?)]))
}

fn expand_row(row: &Row) -> Result<Record, QueryError> {
    let rel = relationship_from_map(&column::<BoltMap>(row, columns::RELATIONSHIP)?)?;
    let node = node_from_map(&column::<BoltMap>(row, columns::NODE)?)?;
    Ok(record([
        (columns::ORIGIN, json!(column::<String>(row, columns::ORIGIN)?)),
        (columns::RELATIONSHIP, encode(&rel)?),
        (columns::NODE, encode(&node)?),
        (columns::DIRECTION, json!(column::<String>(row, columns::DIRECTION)?)),
    ]))
}

fn count_row(row: &Row) -> Result<Record, QueryError> {
    Ok(record([
        (columns::TYPE, json!(column::<String>(row, columns::TYPE)?)),
        (columns::COUNT, json!(column::<i64>(row, columns::COUNT)?)),
    ]))
}

/// A row of plain string columns.
fn strings_row<const N: usize>(row: &Row, names: [&'static str; N]) -> Result<Record, QueryError> {
    let mut out = Record::new();
    for name in names {
        out.insert(name.to_string(), json!(column::<String>(row, name)?));
    }
    Ok(out)
}

impl Neo4jQueryExecutor {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    async fn fetch<F>(&self, operation: &'static str, q: Query, convert: F) -> Result<Vec<Record>, QueryError>
    where
        F: Fn(&Row) -> Result<Record, QueryError>,
    {
        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| classify(operation, e))?;

        let mut records = Vec::new();
        while let Some(row) = result.next().await.map_err(|e| classify(operation, e))? {
            records.push(convert(&row)?);
        }
        Ok(records)
    }

    async fn raw(&self, text: &str, parameters: &Params) -> Result<Vec<Record>, QueryError> {
        if text.trim().is_empty() {
            return Err(QueryError::Malformed("query text is empty".to_string()));
        }
        let mut q = query(text);
        for (key, value) in parameters {
            q = q.param(key, to_bolt(value));
        }
        self.fetch("raw", q, |row| {
            row.to::<Record>()
                .map_err(|e| QueryError::decode(format!("raw row: {}", e)))
        })
        .await
    }

    /// Degree check and delete in one explicit transaction.
    async fn delete_if_detached(&self, id: NodeId) -> Result<Vec<Record>, QueryError> {
        const OP: &str = "delete_node_if_detached";

        let mut txn = self
            .graph
            .start_txn()
            .await
            .map_err(|e| classify(OP, e))?;

        let mut result = txn
            .execute(cypher::lock_and_count_degree(id))
            .await
            .map_err(|e| classify(OP, e))?;

        let degree = match result
            .next(txn.handle())
            .await
            .map_err(|e| classify(OP, e))?
        {
            Some(row) => column::<i64>(&row, columns::DEGREE)?,
            None => {
                txn.rollback().await.map_err(|e| classify(OP, e))?;
                return Ok(Vec::new());
            }
        };

        if degree > 0 {
            // Nothing to change; drops the guard property too.
            txn.rollback().await.map_err(|e| classify(OP, e))?;
            return Ok(vec![record([
                (columns::DEGREE, json!(degree)),
                (columns::DELETED, json!(false)),
            ])]);
        }

        txn.run(cypher::delete_node(id))
            .await
            .map_err(|e| classify(OP, e))?;
        txn.commit().await.map_err(|e| classify(OP, e))?;

        Ok(vec![record([
            (columns::DEGREE, json!(0)),
            (columns::DELETED, json!(true)),
        ])])
    }
}

#[async_trait]
impl QueryExecutor for Neo4jQueryExecutor {
    async fn execute(&self, request: GraphQuery) -> Result<Vec<Record>, QueryError> {
        let operation = request.operation();
        let start = Instant::now();

        let result = match &request {
            GraphQuery::Raw { text, parameters } => self.raw(text, parameters).await,
            GraphQuery::FetchNodes { ids } => {
                self.fetch(operation, cypher::fetch_nodes(ids), node_row).await
            }
            GraphQuery::ListNodes {
                node_type,
                limit,
                offset,
            } => {
                self.fetch(
                    operation,
                    cypher::list_nodes(*node_type, *limit, *offset),
                    node_row,
                )
                .await
            }
            GraphQuery::CreateNode { node } => {
                self.fetch(operation, cypher::create_node(node)?, node_row)
                    .await
            }
            GraphQuery::UpdateNode {
                id,
                payload,
                updated_at,
            } => {
                self.fetch(
                    operation,
                    cypher::update_node(*id, payload, *updated_at)?,
                    node_row,
                )
                .await
            }
            GraphQuery::DeleteNodeIfDetached { id } => self.delete_if_detached(*id).await,
            GraphQuery::FetchRelationship { id } => {
                self.fetch(operation, cypher::fetch_relationship(*id), relationship_row)
                    .await
            }
            GraphQuery::CreateRelationship { relationship } => {
                self.fetch(
                    operation,
                    cypher::create_relationship(relationship)?,
                    relationship_row,
                )
                .await
            }
            GraphQuery::UpdateRelationship {
                id,
                payload,
                updated_at,
            } => {
                self.fetch(
                    operation,
                    cypher::update_relationship(*id, payload, *updated_at)?,
                    relationship_row,
                )
                .await
            }
            GraphQuery::DeleteRelationship { id } => {
                self.fetch(operation, cypher::delete_relationship(*id), |row| {
                    Ok(record([(
                        columns::DELETED,
                        json!(column::<i64>(row, columns::DELETED)?),
                    )]))
                })
                .await
            }
            GraphQuery::Expand {
                node_ids,
                direction,
                relationship_types,
            } => {
                self.fetch(
                    operation,
                    cypher::expand(node_ids, *direction, relationship_types.as_deref()),
                    expand_row,
                )
                .await
            }
            GraphQuery::CountNodesByType => {
                self.fetch(operation, cypher::count_nodes_by_type(), count_row)
                    .await
            }
            GraphQuery::CountRelationshipsByType => {
                self.fetch(operation, cypher::count_relationships_by_type(), count_row)
                    .await
            }
            GraphQuery::EdgesOfTypes { types } => {
                self.fetch(operation, cypher::edges_of_types(types), |row| {
                    strings_row(row, [columns::ID, columns::FROM, columns::TO])
                })
                .await
            }
            GraphQuery::UnconnectedNodes => {
                self.fetch(operation, cypher::unconnected_nodes(), node_row)
                    .await
            }
            GraphQuery::RelationshipSignatures => {
                self.fetch(operation, cypher::relationship_signatures(), |row| {
                    strings_row(
                        row,
                        [columns::ID, columns::TYPE, columns::FROM_TYPE, columns::TO_TYPE],
                    )
                })
                .await
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(rows) => tracing::debug!(operation, elapsed_ms, rows = rows.len(), "Executed graph query"),
            Err(e) => tracing::debug!(operation, elapsed_ms, error = %e, "Graph query failed"),
        }
        result
    }

    fn backend(&self) -> &'static str {
        "neo4j"
    }
}

