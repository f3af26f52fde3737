//! Whole-graph counts.

use std::collections::BTreeMap;

use serde::Deserialize;

use storygraph_domain::GraphStatistics;

use super::GraphEngine;
use crate::infrastructure::ports::{GraphError, GraphQuery, QueryError, Record};

#[derive(Debug, Deserialize)]
struct CountRow {
    #[serde(rename = "type")]
    type_name: String,
    count: u64,
}

fn grouped(rows: Vec<Record>) -> Result<BTreeMap<String, u64>, GraphError> {
    let mut counts = BTreeMap::new();
    for row in rows {
        let CountRow { type_name, count } =
            serde_json::from_value(serde_json::Value::Object(row))
                .map_err(|e| QueryError::decode(format!("count row: {}", e)))?;
        *counts.entry(type_name).or_insert(0) += count;
    }
    Ok(counts)
}

impl GraphEngine {
    /// Node and relationship totals, overall and by type. Recomputed on every
    /// call with the backend's own counting.
    pub async fn get_graph_statistics(&self) -> Result<GraphStatistics, GraphError> {
        let nodes_by_type = grouped(self.executor.execute(GraphQuery::CountNodesByType).await?)?;
        let relationships_by_type = grouped(
            self.executor
                .execute(GraphQuery::CountRelationshipsByType)
                .await?,
        )?;

        Ok(GraphStatistics {
            node_count: nodes_by_type.values().sum(),
            relationship_count: relationships_by_type.values().sum(),
            nodes_by_type,
            relationships_by_type,
        })
    }
}
