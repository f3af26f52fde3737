//! Neo4j schema initialization - constraints and indexes.

use neo4rs::{query, Graph};

use storygraph_domain::RelationshipType;

/// Initialize Neo4j schema with required constraints and indexes.
///
/// This should be called once on startup. Constraints are created with
/// IF NOT EXISTS to be idempotent.
pub async fn ensure_schema(graph: &Graph) -> Result<(), neo4rs::Error> {
    graph
        .run(query(
            "CREATE CONSTRAINT graph_node_id IF NOT EXISTS
             FOR (n:GraphNode) REQUIRE n.id IS UNIQUE",
        ))
        .await?;

    // Listing and statistics group by type.
    graph
        .run(query(
            "CREATE INDEX graph_node_type IF NOT EXISTS
             FOR (n:GraphNode) ON (n.type)",
        ))
        .await?;

    // Relationship lookups by id need one index per relationship type.
    for rt in RelationshipType::all() {
        graph
            .run(query(&format!(
                "CREATE INDEX rel_{}_id IF NOT EXISTS
                 FOR ()-[r:{}]-() ON (r.id)",
                rt.as_str().to_ascii_lowercase(),
                rt.as_str()
            )))
            .await?;
    }

    tracing::info!("Neo4j schema initialized (constraints and indexes ensured)");
    Ok(())
}
