//! Repositories - typed CRUD over the query executor port.
//!
//! Every write is validated here before it reaches the backend; the graph
//! engine itself never mutates graph state.

pub mod node;
pub mod relationship;

pub use node::{NodeRepository, MAX_LIST_LIMIT};
pub use relationship::RelationshipRepository;
