//! Error types for port operations.

use storygraph_domain::DomainError;

/// Failures raised by a [`QueryExecutor`](super::QueryExecutor).
///
/// Backend text is kept for logs; the HTTP layer never returns it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// The backend rejected the query text (syntax, unknown function, bad parameter).
    #[error("Malformed query: {0}")]
    Malformed(String),

    /// The backend could not be reached.
    #[error("Graph backend unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure - includes operation name for tracing.
    #[error("Backend error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    /// A returned record did not have the expected shape.
    #[error("Failed to decode record: {0}")]
    Decode(String),

    /// The executor does not support this kind of request.
    #[error("Unsupported query: {0}")]
    Unsupported(String),
}

impl QueryError {
    pub fn backend(operation: &'static str, message: impl ToString) -> Self {
        Self::Backend {
            operation,
            message: message.to_string(),
        }
    }

    pub fn decode(message: impl ToString) -> Self {
        Self::Decode(message.to_string())
    }
}

/// Errors surfaced by repositories and the graph engine.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Malformed or out-of-range input. Carries every violated constraint.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Referential-integrity violation.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Executor failure, passed through unchanged.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl GraphError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<DomainError> for GraphError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(violations) => Self::Validation(violations),
            DomainError::Constraint(message) => Self::Constraint(message),
            other @ (DomainError::InvalidId(_) | DomainError::Parse(_)) => {
                Self::Validation(vec![other.to_string()])
            }
        }
    }
}
