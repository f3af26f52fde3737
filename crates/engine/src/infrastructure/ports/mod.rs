//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Graph query execution (Neo4j, or the in-memory graph for tests and offline runs)
//! - Clock (for testing)

mod error;
mod query;
mod testing;

pub use error::{GraphError, QueryError};
pub use query::{columns, encode, record, GraphQuery, Params, QueryExecutor, Record, RecordExt};
pub use testing::ClockPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use query::MockQueryExecutor;

#[cfg(test)]
pub use testing::MockClockPort;
