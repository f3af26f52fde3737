//! The node/relationship type catalogue and the compatibility table.
//!
//! These are the stable vocabulary shared by the repositories, the graph
//! engine and any client validating input (see `storygraph-shared`).

mod compatibility;
mod node_type;
mod relationship_type;

pub use compatibility::{
    check_compatibility, expected_pairings, is_compatible, rules_for, CompatibilityRule,
    COMPATIBILITY_TABLE,
};
pub use node_type::{NodeKind, NodeType};
pub use relationship_type::{RelationshipCategory, RelationshipType};
