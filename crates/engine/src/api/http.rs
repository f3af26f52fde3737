//! HTTP routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::fmt::Display;
use std::sync::Arc;
use uuid::Uuid;

use storygraph_domain::{
    Direction, GraphStatistics, Node, NodeId, NodeType, Relationship, RelationshipId,
    RelationshipType, TraversalResult, ValidationReport,
};
use storygraph_shared::{
    clamp_depth, parse_type_list, CreateNodeRequest, CreateRelationshipRequest, ErrorResponse,
    HealthResponse, ListNodesParams, NeighborParams, NeighborsResponse, NodeListResponse,
    PathParams, PathsResponse, QueryResponse, RawQueryRequest, TraverseParams, TypeCatalogue,
    UpdatePayloadRequest, CONTRACT_VERSION, DEFAULT_PATH_DEPTH, DEFAULT_TRAVERSE_DEPTH,
};

use crate::app::App;
use crate::infrastructure::ports::GraphError;
use crate::repositories::MAX_LIST_LIMIT;
use crate::use_cases::TraverseRequest;

/// Page size for `GET /nodes` when `limit` is omitted.
const DEFAULT_LIST_LIMIT: u32 = 100;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/health", get(health))
        // Graph engine
        .route("/graph/query", post(raw_query))
        .route("/graph/traverse", get(traverse))
        .route("/graph/stats", get(statistics))
        .route("/graph/validate", post(validate))
        .route("/graph/catalogue", get(catalogue))
        .route("/paths", get(find_paths))
        // Nodes
        .route("/nodes", post(create_node).get(list_nodes))
        .route(
            "/nodes/{id}",
            get(get_node).patch(update_node).delete(delete_node),
        )
        .route("/nodes/{id}/neighbors", get(neighbors))
        // Relationships
        .route("/relationships", post(create_relationship))
        .route(
            "/relationships/{id}",
            get(get_relationship)
                .patch(update_relationship)
                .delete(delete_relationship),
        )
}

async fn health(State(app): State<Arc<App>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend: app.backend.to_string(),
        contract_version: CONTRACT_VERSION.to_string(),
    })
}

// =============================================================================
// Graph engine
// =============================================================================

async fn raw_query(
    State(app): State<Arc<App>>,
    Json(body): Json<RawQueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let records = app
        .use_cases
        .query
        .execute(&body.query, body.parameters)
        .await?;
    Ok(Json(QueryResponse {
        count: records.len(),
        records,
    }))
}

async fn traverse(
    State(app): State<Arc<App>>,
    Query(params): Query<TraverseParams>,
) -> Result<Json<TraversalResult>, ApiError> {
    let mut request = TraverseRequest::new(
        NodeId::from_uuid(params.start_node_id),
        clamp_depth(params.max_depth, DEFAULT_TRAVERSE_DEPTH),
    )
    .with_direction(parse_direction(params.direction.as_deref())?);

    if let Some(types) = parse_type_list::<RelationshipType>(params.relationship_types.as_deref())
        .map_err(bad_request)?
    {
        request = request.with_relationship_types(types);
    }
    if let Some(types) =
        parse_type_list::<NodeType>(params.node_types.as_deref()).map_err(bad_request)?
    {
        request = request.with_node_types(types);
    }

    let result = app.use_cases.graph.traverse(request).await?;
    Ok(Json(result))
}

async fn statistics(State(app): State<Arc<App>>) -> Result<Json<GraphStatistics>, ApiError> {
    Ok(Json(app.use_cases.graph.get_graph_statistics().await?))
}

async fn validate(State(app): State<Arc<App>>) -> Result<Json<ValidationReport>, ApiError> {
    Ok(Json(app.use_cases.graph.validate_graph_structure().await?))
}

async fn catalogue() -> Json<TypeCatalogue> {
    Json(TypeCatalogue::current())
}

async fn find_paths(
    State(app): State<Arc<App>>,
    Query(params): Query<PathParams>,
) -> Result<Json<PathsResponse>, ApiError> {
    let relationship_types =
        parse_type_list::<RelationshipType>(params.relationship_types.as_deref())
            .map_err(bad_request)?;
    let paths = app
        .use_cases
        .graph
        .find_paths(
            NodeId::from_uuid(params.from),
            NodeId::from_uuid(params.to),
            clamp_depth(params.max_depth, DEFAULT_PATH_DEPTH),
            relationship_types,
        )
        .await?;
    Ok(Json(PathsResponse {
        count: paths.len(),
        paths,
    }))
}

async fn neighbors(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Query(params): Query<NeighborParams>,
) -> Result<Json<NeighborsResponse>, ApiError> {
    let relationship_types =
        parse_type_list::<RelationshipType>(params.relationship_types.as_deref())
            .map_err(bad_request)?;
    let neighbors = app
        .use_cases
        .graph
        .get_node_neighbors(
            NodeId::from_uuid(id),
            parse_direction(params.direction.as_deref())?,
            relationship_types,
        )
        .await?;
    Ok(Json(NeighborsResponse { neighbors }))
}

// =============================================================================
// Nodes
// =============================================================================

async fn create_node(
    State(app): State<Arc<App>>,
    Json(body): Json<CreateNodeRequest>,
) -> Result<(StatusCode, Json<Node>), ApiError> {
    let node_type: NodeType = body.node_type.parse().map_err(bad_request)?;
    let node = app.repositories.nodes.create(node_type, body.payload).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

async fn list_nodes(
    State(app): State<Arc<App>>,
    Query(params): Query<ListNodesParams>,
) -> Result<Json<NodeListResponse>, ApiError> {
    let node_type = params
        .node_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::parse::<NodeType>)
        .transpose()
        .map_err(bad_request)?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let nodes = app
        .repositories
        .nodes
        .list(node_type, limit, offset)
        .await?;
    Ok(Json(NodeListResponse {
        nodes,
        limit,
        offset,
    }))
}

async fn get_node(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Node>, ApiError> {
    let id = NodeId::from_uuid(id);
    let node = app
        .repositories
        .nodes
        .get(id)
        .await?
        .ok_or_else(|| GraphError::not_found("Node", id))?;
    Ok(Json(node))
}

async fn update_node(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePayloadRequest>,
) -> Result<Json<Node>, ApiError> {
    let node = app
        .repositories
        .nodes
        .update(NodeId::from_uuid(id), body.payload)
        .await?;
    Ok(Json(node))
}

async fn delete_node(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.repositories.nodes.delete(NodeId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Relationships
// =============================================================================

async fn create_relationship(
    State(app): State<Arc<App>>,
    Json(body): Json<CreateRelationshipRequest>,
) -> Result<(StatusCode, Json<Relationship>), ApiError> {
    let relationship_type: RelationshipType =
        body.relationship_type.parse().map_err(bad_request)?;
    let relationship = app
        .repositories
        .relationships
        .create(
            relationship_type,
            NodeId::from_uuid(body.from_node_id),
            NodeId::from_uuid(body.to_node_id),
            body.payload,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(relationship)))
}

async fn get_relationship(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Relationship>, ApiError> {
    let id = RelationshipId::from_uuid(id);
    let relationship = app
        .repositories
        .relationships
        .get(id)
        .await?
        .ok_or_else(|| GraphError::not_found("Relationship", id))?;
    Ok(Json(relationship))
}

async fn update_relationship(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePayloadRequest>,
) -> Result<Json<Relationship>, ApiError> {
    let relationship = app
        .repositories
        .relationships
        .update(RelationshipId::from_uuid(id), body.payload)
        .await?;
    Ok(Json(relationship))
}

async fn delete_relationship(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.repositories
        .relationships
        .delete(RelationshipId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Errors
// =============================================================================

/// Missing or blank direction means both.
fn parse_direction(raw: Option<&str>) -> Result<Direction, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse().map_err(bad_request),
        None => Ok(Direction::Both),
    }
}

fn bad_request(e: impl Display) -> ApiError {
    ApiError::BadRequest(e.to_string())
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Validation(Vec<String>),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new(msg))).into_response()
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
            }
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_details("Validation failed", details)),
            )
                .into_response(),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                Json(ErrorResponse::with_details("Constraint violation", vec![msg])),
            )
                .into_response(),
            ApiError::Internal(msg) => {
                tracing::warn!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal error")),
                )
                    .into_response()
            }
        }
    }
}

impl From<GraphError> for ApiError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::Validation(violations) => ApiError::Validation(violations),
            GraphError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            GraphError::Constraint(msg) => ApiError::Conflict(msg),
            GraphError::Query(inner) => ApiError::Internal(inner.to_string()),
        }
    }
}
