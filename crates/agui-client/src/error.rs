//! Error types for AG-UI client operations.

use agui_core::EventValidationError;
use thiserror::Error;

use crate::reducer::ProtocolViolation;

/// Errors that can occur while consuming a stream.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A frame did not hold a valid event
    #[error("Decode error: {0}")]
    Decode(#[from] EventValidationError),

    /// The server sent a fallback error frame
    #[error("Server error frame: {0}")]
    ErrorFrame(String),

    /// An event broke the protocol sequence
    #[error("Protocol violation: {0}")]
    Violation(#[from] ProtocolViolation),

    /// Reading the stream failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;
