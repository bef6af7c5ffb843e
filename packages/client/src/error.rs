//! Error types for the chat client.

use irori_shared::protocol::NameError;
use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The name fails the same checks the server applies
    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    /// The server refused the name; holds the server's line
    #[error("Server rejected the name: {0}")]
    NameRejected(String),

    /// The server announced it is shutting down
    #[error("Server is shutting down")]
    ServerShutdown,

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl From<std::io::Error> for ClientError {
    fn from(error: std::io::Error) -> Self {
        Self::ConnectionError(error.to_string())
    }
}
