//! Error types for AG-UI server operations.

use agui_core::AgUiError;
use thiserror::Error;

use crate::encoder::EncodingError;
use crate::transport::SendError;

/// Errors that can occur in AG-UI server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Core AG-UI error
    #[error("Core error: {0}")]
    Core(#[from] AgUiError),

    /// An event could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Channel or stream error
    #[error("Channel error: {0}")]
    Channel(#[from] SendError),

    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias using ServerError
pub type Result<T> = std::result::Result<T, ServerError>;
