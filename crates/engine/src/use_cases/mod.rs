//! Use cases - read-side graph analysis and raw query passthrough.

pub mod graph;
pub mod query;

pub use graph::{GraphEngine, TraverseRequest};
pub use query::RawQuery;
