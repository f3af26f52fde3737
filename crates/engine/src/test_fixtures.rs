//! Shared builders for unit tests that run against the in-memory graph.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use storygraph_domain::{Node, NodeType, Payload, Relationship, RelationshipType};

use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::memory::InMemoryGraph;
use crate::infrastructure::ports::{ClockPort, QueryExecutor};
use crate::repositories::{NodeRepository, RelationshipRepository};
use crate::use_cases::graph::GraphEngine;

pub fn payload(value: Value) -> Payload {
    value
        .as_object()
        .cloned()
        .expect("test payloads are JSON objects")
}

pub fn fixed_clock() -> Arc<dyn ClockPort> {
    Arc::new(FixedClock(
        Utc.timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid timestamp"),
    ))
}

/// Repositories and engine wired to one fresh in-memory graph.
pub struct GraphFixture {
    pub executor: Arc<dyn QueryExecutor>,
    pub nodes: Arc<NodeRepository>,
    pub relationships: Arc<RelationshipRepository>,
    pub engine: GraphEngine,
}

impl GraphFixture {
    pub fn new() -> Self {
        let executor: Arc<dyn QueryExecutor> = Arc::new(InMemoryGraph::new());
        let clock = fixed_clock();
        let nodes = Arc::new(NodeRepository::new(executor.clone(), clock.clone()));
        let relationships = Arc::new(RelationshipRepository::new(
            executor.clone(),
            clock,
            nodes.clone(),
        ));
        Self {
            engine: GraphEngine::new(executor.clone()),
            executor,
            nodes,
            relationships,
        }
    }

    pub async fn node(&self, node_type: NodeType, value: Value) -> Node {
        self.nodes
            .create(node_type, payload(value))
            .await
            .expect("fixture node is valid")
    }

    pub async fn scene(&self, title: &str) -> Node {
        self.node(NodeType::Scene, json!({ "title": title })).await
    }

    pub async fn character(&self, name: &str) -> Node {
        self.node(NodeType::Character, json!({ "name": name })).await
    }

    pub async fn connect(&self, relationship_type: RelationshipType, from: &Node, to: &Node) -> Relationship {
        self.connect_with(relationship_type, from, to, json!({})).await
    }

    pub async fn connect_with(
        &self,
        relationship_type: RelationshipType,
        from: &Node,
        to: &Node,
        value: Value,
    ) -> Relationship {
        self.relationships
            .create(relationship_type, from.id, to.id, payload(value))
            .await
            .expect("fixture relationship is compatible")
    }
}
