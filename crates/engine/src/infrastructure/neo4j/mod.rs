//! Neo4j executor: translates structured graph requests to Cypher.

use std::time::Duration;

use neo4rs::{query, Graph};

mod convert;
mod cypher;
mod executor;
mod schema;

#[cfg(test)]
mod integration_tests;

pub use executor::Neo4jQueryExecutor;
pub use schema::ensure_schema;

/// Connect to Neo4j with exponential backoff.
///
/// Each attempt is verified with `RETURN 1`. Delays run 500ms, 1s, 2s, 4s and
/// are capped at 5s.
pub async fn connect_with_retry(
    uri: &str,
    user: &str,
    pass: &str,
    max_attempts: u32,
) -> Result<Graph, neo4rs::Error> {
    let initial_delay = Duration::from_millis(500);
    let max_delay = Duration::from_secs(5);

    let mut attempt = 0;
    let mut delay = initial_delay;

    loop {
        attempt += 1;

        let outcome = match Graph::new(uri, user, pass).await {
            Ok(graph) => {
                let verified = graph.run(query("RETURN 1")).await;
                verified.map(|()| graph)
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(graph) => {
                tracing::info!(attempt, uri, "Neo4j connection established and verified");
                return Ok(graph);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying Neo4j connection"
                );
            }
        }

        tokio::time::sleep(delay).await;
        delay = std::cmp::min(delay.saturating_mul(2), max_delay);
    }
}
