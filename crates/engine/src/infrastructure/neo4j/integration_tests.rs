//! Executor tests against a real Neo4j started with testcontainers.

use std::sync::Arc;

use neo4rs::Graph;
use serde_json::json;
use testcontainers::{core::WaitFor, runners::AsyncRunner, ContainerAsync, GenericImage};

use storygraph_domain::{Direction, NodeType, RelationshipType};

use super::{connect_with_retry, ensure_schema, Neo4jQueryExecutor};
use crate::infrastructure::ports::{GraphError, Params, QueryExecutor};
use crate::test_fixtures::{fixed_clock, payload};
use crate::use_cases::TraverseRequest;
use crate::App;

const TEST_NEO4J_PASSWORD: &str = "testpassword";

fn neo4j_image() -> GenericImage {
    GenericImage::new("neo4j", "5.26.0-community")
        .with_env_var("NEO4J_AUTH", format!("neo4j/{TEST_NEO4J_PASSWORD}"))
        .with_env_var("NEO4J_server_memory_heap_initial__size", "256m")
        .with_env_var("NEO4J_server_memory_heap_max__size", "512m")
        .with_exposed_port(7687)
        .with_wait_for(WaitFor::seconds(5))
}

/// Start a container and return it with a schema-initialised connection.
/// The container stops when dropped.
async fn start_neo4j() -> (ContainerAsync<GenericImage>, Graph) {
    let container = neo4j_image().start().await;
    let bolt_port = container.get_host_port_ipv4(7687).await;
    let uri = format!("bolt://127.0.0.1:{bolt_port}");

    let graph = connect_with_retry(&uri, "neo4j", TEST_NEO4J_PASSWORD, 30)
        .await
        .expect("connect to Neo4j container");
    ensure_schema(&graph).await.expect("ensure schema");
    // Idempotent
    ensure_schema(&graph).await.expect("ensure schema twice");
    (container, graph)
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn engine_round_trip_over_neo4j() {
    let (_container, graph) = start_neo4j().await;
    let executor: Arc<dyn QueryExecutor> = Arc::new(Neo4jQueryExecutor::new(graph));
    let app = App::new(executor, fixed_clock());
    let nodes = &app.repositories.nodes;
    let relationships = &app.repositories.relationships;
    let engine = &app.use_cases.graph;

    let s1 = nodes
        .create(NodeType::Scene, payload(json!({"title": "S1", "tension": 3})))
        .await
        .unwrap();
    let s2 = nodes
        .create(NodeType::Scene, payload(json!({"title": "S2"})))
        .await
        .unwrap();
    let s3 = nodes
        .create(NodeType::Scene, payload(json!({"title": "S3"})))
        .await
        .unwrap();
    let mira = nodes
        .create(NodeType::Character, payload(json!({"name": "Mira"})))
        .await
        .unwrap();

    assert_eq!(nodes.get(s1.id).await.unwrap(), Some(s1.clone()));

    let first = relationships
        .create(RelationshipType::LeadsTo, s1.id, s2.id, payload(json!({"weight": 2.0})))
        .await
        .unwrap();
    relationships
        .create(RelationshipType::LeadsTo, s2.id, s3.id, payload(json!({})))
        .await
        .unwrap();

    let err = relationships
        .create(RelationshipType::AppearsIn, s1.id, mira.id, payload(json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Constraint(_)));

    // Paths
    let paths = engine.find_paths(s1.id, s3.id, 5, None).await.unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes.len(), 3);
    assert_eq!(paths[0].weight, 3.0);

    // Traversal
    let traversal = engine
        .traverse(TraverseRequest::new(s1.id, 10).with_direction(Direction::Outgoing))
        .await
        .unwrap();
    assert_eq!(traversal.nodes.len(), 3);
    assert_eq!(traversal.relationships.len(), 2);

    // Neighbors
    let neighbors = engine
        .get_node_neighbors(s2.id, Direction::Both, None)
        .await
        .unwrap();
    assert_eq!(neighbors.len(), 2);

    // Statistics
    let stats = engine.get_graph_statistics().await.unwrap();
    assert_eq!(stats.node_count, 4);
    assert_eq!(stats.relationship_count, 2);
    assert_eq!(stats.nodes_by_type.get("Scene"), Some(&3));

    // Validation: Mira is orphaned, no cycles yet.
    let report = engine.validate_graph_structure().await.unwrap();
    assert!(report.is_valid);
    assert_eq!(report.orphaned_nodes, vec![mira.id]);

    relationships
        .create(RelationshipType::LeadsTo, s3.id, s1.id, payload(json!({})))
        .await
        .unwrap();
    let report = engine.validate_graph_structure().await.unwrap();
    assert!(!report.is_valid);
    assert_eq!(report.circular_dependencies.len(), 1);
    assert_eq!(report.circular_dependencies[0].len(), 3);

    // Updates and detached delete
    let updated = nodes
        .update(s1.id, payload(json!({"tension": null, "mood": "calm"})))
        .await
        .unwrap();
    assert!(updated.payload.get("tension").is_none());
    assert_eq!(updated.payload.get("mood"), Some(&json!("calm")));

    assert!(matches!(
        nodes.delete(s1.id).await.unwrap_err(),
        GraphError::Constraint(_)
    ));
    relationships.delete(first.id).await.unwrap();
    assert!(relationships.delete(first.id).await.unwrap_err().is_not_found());

    nodes.delete(mira.id).await.unwrap();
    assert!(nodes.get(mira.id).await.unwrap().is_none());
    assert!(nodes.delete(mira.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn raw_queries_pass_through() {
    let (_container, graph) = start_neo4j().await;
    let executor: Arc<dyn QueryExecutor> = Arc::new(Neo4jQueryExecutor::new(graph));
    let app = App::new(executor, fixed_clock());

    let mut params = Params::new();
    params.insert("name".to_string(), json!("lantern"));
    params.insert("tags".to_string(), json!(["old", "brass"]));
    let rows = app
        .use_cases
        .query
        .execute("RETURN $name AS name, size($tags) AS tags", params)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&json!("lantern")));
    assert_eq!(rows[0].get("tags"), Some(&json!(2)));

    let err = app
        .use_cases
        .query
        .execute("MATCH (n RETURN n", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Query(_)));
}
