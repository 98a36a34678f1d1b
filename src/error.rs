//! Error types for the Atlas client
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Unified error type for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    // -------------------------------------------------------------------------
    // Reply Errors
    // -------------------------------------------------------------------------
    /// Reply shape does not match the operation's declared contract
    #[error("Protocol decode error: {0}")]
    ProtocolDecode(String),

    /// Explicit error reply from the server, passed through verbatim
    #[error("Server error: {0}")]
    Server(String),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    /// Transport failure or disconnect while the operation was pending
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Dispatch Errors
    // -------------------------------------------------------------------------
    /// No literal of the operation is compatible with the negotiated features
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Operation removed from the backlog before it was transmitted
    #[error("Operation cancelled before transmission")]
    Cancelled,

    /// Arguments the server would reject before execution
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// True for failures that took the whole connection down
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ClientError::Connectivity(_) | ClientError::Io(_))
    }
}
