//! StoryGraph Shared - the wire contract between the engine and its clients
//!
//! This crate contains the types a client needs to talk to the engine:
//! - The versioned node/relationship type catalogue and compatibility table
//! - HTTP request bodies and query-string parameters
//! - HTTP response envelopes
//!
//! # Design Principles
//!
//! 1. **No business logic** - pure data types plus small parsing helpers
//! 2. **No domain IDs** - DTOs carry raw `uuid::Uuid`; type names stay strings
//!    until the engine parses them, so unknown names surface as 400s

pub mod catalogue;
pub mod requests;
pub mod responses;

pub use catalogue::{
    CompatibilityEntry, NodeTypeInfo, RelationshipTypeInfo, TypeCatalogue, CONTRACT_VERSION,
};
pub use requests::{
    clamp_depth, parse_type_list, CreateNodeRequest, CreateRelationshipRequest, ListNodesParams,
    NeighborParams, PathParams, RawQueryRequest, TraverseParams, UpdatePayloadRequest,
    DEFAULT_PATH_DEPTH, DEFAULT_TRAVERSE_DEPTH,
};
pub use responses::{
    ErrorResponse, HealthResponse, NeighborsResponse, NodeListResponse, PathsResponse,
    QueryResponse,
};
