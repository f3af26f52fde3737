//! Raw query passthrough.

use std::sync::Arc;

use crate::infrastructure::ports::{GraphError, GraphQuery, Params, QueryExecutor, Record};

/// Hands caller-written query text straight to the executor.
pub struct RawQuery {
    executor: Arc<dyn QueryExecutor>,
}

impl RawQuery {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// The only check is that the text is not blank; everything else is up
    /// to the backend.
    pub async fn execute(&self, text: &str, parameters: Params) -> Result<Vec<Record>, GraphError> {
        if text.trim().is_empty() {
            return Err(GraphError::validation("query: must be a non-empty string"));
        }
        let rows = self
            .executor
            .execute(GraphQuery::Raw {
                text: text.to_string(),
                parameters,
            })
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryGraph;
    use crate::infrastructure::ports::{record, MockQueryExecutor, QueryError};
    use serde_json::json;

    #[tokio::test]
    async fn blank_text_is_rejected_before_the_executor() {
        let mut executor = MockQueryExecutor::new();
        executor.expect_execute().never();

        let err = RawQuery::new(Arc::new(executor))
            .execute("   ", Params::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::Validation(_)));
    }

    #[tokio::test]
    async fn text_and_parameters_pass_through_unchanged() {
        let mut executor = MockQueryExecutor::new();
        executor
            .expect_execute()
            .withf(|q| match q {
                GraphQuery::Raw { text, parameters } => {
                    text == "MATCH (n) WHERE n.id = $id RETURN n.id AS id"
                        && parameters.get("id") == Some(&json!("abc"))
                }
                _ => false,
            })
            .returning(|_| Ok(vec![record([("id", json!("abc"))])]));

        let mut params = Params::new();
        params.insert("id".to_string(), json!("abc"));
        let rows = RawQuery::new(Arc::new(executor))
            .execute("MATCH (n) WHERE n.id = $id RETURN n.id AS id", params)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn backend_refusal_surfaces_as_query_error() {
        let err = RawQuery::new(Arc::new(InMemoryGraph::new()))
            .execute("MATCH (n) RETURN n", Params::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::Query(QueryError::Unsupported(_))));
    }
}
