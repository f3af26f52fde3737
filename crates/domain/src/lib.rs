//! StoryGraph domain: the node and relationship type catalogue, payload
//! schemas, graph entities and the pure algorithms run over them.
//!
//! Nothing in this crate performs I/O.

pub mod catalogue;
pub mod entities;
pub mod error;
pub mod graph;
pub mod ids;
pub mod schema;

pub use catalogue::{
    check_compatibility, expected_pairings, is_compatible, rules_for, CompatibilityRule, NodeKind,
    NodeType, RelationshipCategory, RelationshipType, COMPATIBILITY_TABLE,
};
pub use entities::{shortest_paths, Node, Path, Relationship, DEFAULT_EDGE_WEIGHT};
pub use error::DomainError;
pub use graph::{
    find_cycles, Direction, GraphStatistics, NeighborRecord, Subgraph, TraversalResult,
    ValidationReport, CIRCULAR_DEPENDENCY_ERROR, MAX_TRAVERSAL_DEPTH, ORPHANED_NODES_WARNING,
};
pub use ids::{NodeId, RelationshipId};
pub use schema::{merge_payload, validate_node_payload, validate_relationship_payload, Payload};
