//! Unified error types for the domain layer
//!
//! Payload validation, catalogue parsing and compatibility checks all report
//! through [`DomainError`], so adapters never need to fall back to `String`.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Payload validation failed. Carries every violated constraint, not just the first.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Business rule violation (e.g. an illegal relationship pairing)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (unknown catalogue member, malformed enum string)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for a single violated constraint.
    ///
    /// # Example
    /// ```ignore
    /// if payload.is_empty() {
    ///     return Err(DomainError::validation("payload: must be a JSON object"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(vec![msg.into()])
    }

    /// Creates a validation error from a list of violations.
    pub fn validation_all(violations: Vec<String>) -> Self {
        Self::Validation(violations)
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any catalogue member.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Every violation carried by this error, one message per entry.
    pub fn violations(&self) -> Vec<String> {
        match self {
            Self::Validation(all) => all.clone(),
            other => vec![other.to_string()],
        }
    }
}
