//! Whole-graph structural validation.

use serde::Deserialize;

use storygraph_domain::{
    expected_pairings, find_cycles, is_compatible, Node, NodeId, NodeType, RelationshipType,
    ValidationReport,
};

use super::GraphEngine;
use crate::infrastructure::ports::{columns, GraphError, GraphQuery, QueryError, Record, RecordExt};

#[derive(Debug, Deserialize)]
struct EdgeRow {
    from: NodeId,
    to: NodeId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureRow {
    id: String,
    #[serde(rename = "type")]
    relationship_type: String,
    from_type: String,
    to_type: String,
}

fn rows<T: serde::de::DeserializeOwned>(what: &str, rows: Vec<Record>) -> Result<Vec<T>, GraphError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(serde_json::Value::Object(row))
                .map_err(|e| GraphError::from(QueryError::decode(format!("{} row: {}", what, e))))
        })
        .collect()
}

/// The integrity error for one stored relationship, if any.
fn integrity_error(row: &SignatureRow) -> Option<String> {
    let Ok(relationship_type) = row.relationship_type.parse::<RelationshipType>() else {
        return Some(format!(
            "Relationship {} has unknown type {}",
            row.id, row.relationship_type
        ));
    };
    let (Ok(from), Ok(to)) = (row.from_type.parse::<NodeType>(), row.to_type.parse::<NodeType>())
    else {
        return Some(format!(
            "Relationship {} connects unknown node types {} -> {}",
            row.id, row.from_type, row.to_type
        ));
    };
    if is_compatible(relationship_type, from, to) {
        return None;
    }
    Some(format!(
        "Relationship {} ({}) connects {} -> {}; expected {}",
        row.id,
        relationship_type,
        from,
        to,
        expected_pairings(relationship_type)
    ))
}

impl GraphEngine {
    /// Run cycle, orphan and integrity checks over the whole graph.
    ///
    /// Progression cycles and integrity violations are errors; orphans are a
    /// warning only. Root containers (`Story`) are never orphans.
    pub async fn validate_graph_structure(&self) -> Result<ValidationReport, GraphError> {
        let edges: Vec<EdgeRow> = rows(
            "edge",
            self.executor
                .execute(GraphQuery::EdgesOfTypes {
                    types: RelationshipType::progression().to_vec(),
                })
                .await?,
        )?;
        let edge_list: Vec<(NodeId, NodeId)> = edges.iter().map(|e| (e.from, e.to)).collect();
        let cycles = find_cycles(&edge_list);

        let unconnected = self.executor.execute(GraphQuery::UnconnectedNodes).await?;
        let mut orphans = Vec::new();
        for row in unconnected {
            let node: Node = row.decode(columns::NODE)?;
            if !node.node_type.is_orphan_exempt() {
                orphans.push(node.id);
            }
        }

        let signatures: Vec<SignatureRow> = rows(
            "signature",
            self.executor
                .execute(GraphQuery::RelationshipSignatures)
                .await?,
        )?;
        let integrity_errors: Vec<String> = signatures.iter().filter_map(integrity_error).collect();

        let report = ValidationReport::from_checks(cycles, orphans, integrity_errors);
        tracing::info!(
            is_valid = report.is_valid,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            orphaned_nodes = report.orphaned_nodes.len(),
            cycles = report.circular_dependencies.len(),
            "Graph structure validated"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{record, MockQueryExecutor};
    use crate::test_fixtures::GraphFixture;
    use serde_json::json;
    use std::sync::Arc;
    use storygraph_domain::{
        RelationshipId, CIRCULAR_DEPENDENCY_ERROR, ORPHANED_NODES_WARNING,
    };

    #[tokio::test]
    async fn empty_graph_is_valid_without_warnings() {
        let report = GraphFixture::new()
            .engine
            .validate_graph_structure()
            .await
            .unwrap();
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.orphaned_nodes.is_empty());
        assert!(report.circular_dependencies.is_empty());
    }

    #[tokio::test]
    async fn progression_three_cycle_is_an_error() {
        let f = GraphFixture::new();
        let x = f.scene("X").await;
        let y = f.scene("Y").await;
        let z = f.scene("Z").await;
        f.connect(RelationshipType::LeadsTo, &x, &y).await;
        f.connect(RelationshipType::LeadsTo, &y, &z).await;
        f.connect(RelationshipType::LeadsTo, &z, &x).await;

        let report = f.engine.validate_graph_structure().await.unwrap();
        assert!(!report.is_valid);
        assert!(report.errors.contains(&CIRCULAR_DEPENDENCY_ERROR.to_string()));
        assert_eq!(report.circular_dependencies.len(), 1);
        assert_eq!(report.circular_dependencies[0].len(), 3);
        for id in [x.id, y.id, z.id] {
            assert!(report.circular_dependencies[0].contains(&id));
        }
    }

    #[tokio::test]
    async fn non_progression_cycles_are_ignored() {
        let f = GraphFixture::new();
        let ada = f.character("Ada").await;
        let bo = f.character("Bo").await;
        f.connect(RelationshipType::RelatesTo, &ada, &bo).await;
        f.connect(RelationshipType::RelatesTo, &bo, &ada).await;

        let report = f.engine.validate_graph_structure().await.unwrap();
        assert!(report.is_valid);
        assert!(report.circular_dependencies.is_empty());
    }

    #[tokio::test]
    async fn orphan_is_reported_until_connected() {
        let f = GraphFixture::new();
        let lonely = f.scene("Lonely").await;
        f.node(NodeType::Story, json!({"title": "Saga"})).await;

        let report = f.engine.validate_graph_structure().await.unwrap();
        assert!(report.is_valid);
        assert_eq!(report.orphaned_nodes, vec![lonely.id]);
        assert_eq!(report.warnings, vec![ORPHANED_NODES_WARNING.to_string()]);

        let next = f.scene("Next").await;
        f.connect(RelationshipType::LeadsTo, &lonely, &next).await;

        let report = f.engine.validate_graph_structure().await.unwrap();
        assert!(report.orphaned_nodes.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn stored_incompatible_relationship_is_an_integrity_error() {
        let bad_id = RelationshipId::new();
        let mut executor = MockQueryExecutor::new();
        executor
            .expect_execute()
            .withf(|q| matches!(q, GraphQuery::EdgesOfTypes { .. }))
            .returning(|_| Ok(Vec::new()));
        executor
            .expect_execute()
            .withf(|q| matches!(q, GraphQuery::UnconnectedNodes))
            .returning(|_| Ok(Vec::new()));
        executor
            .expect_execute()
            .withf(|q| matches!(q, GraphQuery::RelationshipSignatures))
            .returning(move |_| {
                Ok(vec![
                    record([
                        ("id", json!(bad_id)),
                        ("type", json!("APPEARS_IN")),
                        ("fromType", json!("Scene")),
                        ("toType", json!("Character")),
                    ]),
                    record([
                        ("id", json!("legacy-1")),
                        ("type", json!("HAUNTS")),
                        ("fromType", json!("Character")),
                        ("toType", json!("Location")),
                    ]),
                ])
            });

        let report = GraphEngine::new(Arc::new(executor))
            .validate_graph_structure()
            .await
            .unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains(&bad_id.to_string()));
        assert!(report.errors[0].contains("Character -> Scene"));
        assert!(report.errors[1].contains("legacy-1"));
    }

    #[tokio::test]
    async fn executor_failure_propagates() {
        let mut executor = MockQueryExecutor::new();
        executor
            .expect_execute()
            .returning(|_| Err(QueryError::Malformed("bad".into())));

        let err = GraphEngine::new(Arc::new(executor))
            .validate_graph_structure()
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::Query(QueryError::Malformed(_))));
    }
}
