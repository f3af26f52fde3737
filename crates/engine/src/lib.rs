//! StoryGraph Engine library.
//!
//! Query, traversal and validation engine over a narrative property graph.
//!
//! ## Structure
//!
//! - `repositories/` - Typed node and relationship CRUD with payload validation
//! - `use_cases/` - The graph engine and raw query passthrough
//! - `infrastructure/` - Ports plus the Neo4j and in-memory executors
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod repositories;
pub mod use_cases;

/// Shared builders for unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
