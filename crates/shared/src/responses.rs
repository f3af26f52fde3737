//! HTTP response envelopes.
//!
//! Entities themselves (nodes, relationships, paths, reports) are serialized
//! straight from the domain types; these wrap lists and errors.

use serde::{Deserialize, Serialize};

use storygraph_domain::{NeighborRecord, Node, Path};

/// Error body for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(error: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub records: Vec<serde_json::Map<String, serde_json::Value>>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsResponse {
    pub paths: Vec<Path>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborsResponse {
    pub neighbors: Vec<NeighborRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeListResponse {
    pub nodes: Vec<Node>,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub contract_version: String,
}
