//! Error types for the streaming runtime

use crossbeam_channel::SendError;

/// Error type for work function operations
#[derive(Debug, thiserror::Error)]
pub enum WorkError {
    #[error("failed to send to output channel: {0}")]
    SendError(String),

    #[error("node-specific error: {0}")]
    NodeError(String),

    #[error("shutdown signal received")]
    Shutdown,
}

impl<T> From<SendError<T>> for WorkError {
    fn from(e: SendError<T>) -> Self {
        WorkError::SendError(format!("{}", e))
    }
}

/// Result type for work functions
pub type WorkResult<T = ()> = Result<T, WorkError>;
