//! Domain error types

use thiserror::Error;

/// Why a model reply could not be turned into a [`CommandBatch`].
///
/// [`CommandBatch`]: crate::command::entities::CommandBatch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No brace-delimited object could be parsed out of the reply.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// An object was found but does not satisfy the command batch schema.
    #[error("Schema violation: {0}")]
    SchemaViolation(String),
}

impl ValidationError {
    /// Short machine-readable tag, used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MalformedResponse(_) => "malformed_response",
            ValidationError::SchemaViolation(_) => "schema_violation",
        }
    }

    /// Check if this error is a schema violation (as opposed to unparseable text)
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, ValidationError::SchemaViolation(_))
    }
}
