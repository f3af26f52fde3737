//! Graph entities: nodes, relationships and the paths built from them.

mod node;
mod path;
mod relationship;

pub use node::Node;
pub use path::{shortest_paths, Path, DEFAULT_EDGE_WEIGHT};
pub use relationship::Relationship;
