//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, QueryExecutor};
use crate::repositories::{NodeRepository, RelationshipRepository};
use crate::use_cases::{GraphEngine, RawQuery};

/// Main application state.
///
/// Holds the repositories and use cases built over one executor.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    /// Name of the executor backend, reported by `/health`.
    pub backend: &'static str,
}

/// Container for the repositories.
pub struct Repositories {
    pub nodes: Arc<NodeRepository>,
    pub relationships: Arc<RelationshipRepository>,
}

/// Container for all use cases.
pub struct UseCases {
    pub graph: Arc<GraphEngine>,
    pub query: RawQuery,
}

impl App {
    /// Wire every repository and use case to the given executor.
    pub fn new(executor: Arc<dyn QueryExecutor>, clock: Arc<dyn ClockPort>) -> Self {
        let nodes = Arc::new(NodeRepository::new(executor.clone(), clock.clone()));
        let relationships = Arc::new(RelationshipRepository::new(
            executor.clone(),
            clock,
            nodes.clone(),
        ));

        Self {
            repositories: Repositories {
                nodes,
                relationships,
            },
            use_cases: UseCases {
                graph: Arc::new(GraphEngine::new(executor.clone())),
                query: RawQuery::new(executor.clone()),
            },
            backend: executor.backend(),
        }
    }
}
