//! Error types for AG-UI core operations.

use crate::event::EventValidationError;
use crate::patch::PatchError;
use thiserror::Error;

/// Errors that can occur in AG-UI core operations.
#[derive(Debug, Error)]
pub enum AgUiError {
    /// Error during JSON serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An event violated a protocol invariant
    #[error("Validation error: {0}")]
    Validation(#[from] EventValidationError),

    /// Invalid message format or content
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// State operation error
    #[error("State error: {0}")]
    State(String),

    /// JSON Patch could not be parsed or applied
    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Result type alias using AgUiError
pub type Result<T> = std::result::Result<T, AgUiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts() {
        let err: AgUiError = EventValidationError::EmptyDelta.into();
        assert_eq!(err.to_string(), "Validation error: Delta must not be an empty string");
    }

    #[test]
    fn test_patch_error_is_transparent() {
        let err: AgUiError = PatchError::Apply("path not found".into()).into();
        assert_eq!(err.to_string(), "Patch application failed: path not found");
    }
}
