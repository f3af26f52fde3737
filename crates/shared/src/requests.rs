//! HTTP request bodies and query-string parameters.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storygraph_domain::MAX_TRAVERSAL_DEPTH;

/// Depth used by `/graph/traverse` when `maxDepth` is omitted.
pub const DEFAULT_TRAVERSE_DEPTH: usize = 3;
/// Depth used by `/paths` when `maxDepth` is omitted.
pub const DEFAULT_PATH_DEPTH: usize = 5;

/// Body of `POST /graph/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQueryRequest {
    pub query: String,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST /nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNodeRequest {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// Body of `PATCH /nodes/{id}` and `PATCH /relationships/{id}`.
///
/// A `null` value removes the field from the stored payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayloadRequest {
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST /relationships`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelationshipRequest {
    #[serde(rename = "type")]
    pub relationship_type: String,
    pub from_node_id: Uuid,
    pub to_node_id: Uuid,
    #[serde(default)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// Query string of `GET /graph/traverse`. Type lists are comma separated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraverseParams {
    pub start_node_id: Uuid,
    pub max_depth: Option<i64>,
    pub relationship_types: Option<String>,
    pub node_types: Option<String>,
    pub direction: Option<String>,
}

/// Query string of `GET /paths`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathParams {
    pub from: Uuid,
    pub to: Uuid,
    pub max_depth: Option<i64>,
    pub relationship_types: Option<String>,
}

/// Query string of `GET /nodes/{id}/neighbors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborParams {
    pub direction: Option<String>,
    pub relationship_types: Option<String>,
}

/// Query string of `GET /nodes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNodesParams {
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Clamp a requested depth into `1..=MAX_TRAVERSAL_DEPTH`, using `default`
/// when none was given. Zero and negative depths become 1.
pub fn clamp_depth(requested: Option<i64>, default: usize) -> usize {
    match requested {
        Some(depth) => depth.clamp(1, MAX_TRAVERSAL_DEPTH as i64) as usize,
        None => default.clamp(1, MAX_TRAVERSAL_DEPTH),
    }
}

/// Parse a comma-separated list of catalogue names.
///
/// `None`, an empty string and a list of blanks all mean "no filter". The
/// first unknown name fails the whole list.
pub fn parse_type_list<T: FromStr>(raw: Option<&str>) -> Result<Option<Vec<T>>, T::Err> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let parsed = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<Vec<T>, _>>()?;
    Ok((!parsed.is_empty()).then_some(parsed))
}
