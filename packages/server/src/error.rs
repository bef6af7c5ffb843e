//! Error types for the chat server.

use std::io;

use irori_shared::protocol::NameError;
use thiserror::Error;

/// Failures confined to a single connection.
///
/// None of these ever touches the message log or another session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Read or write deadline exceeded. Retry, not fatal.
    #[error("I/O deadline exceeded")]
    TransientIoTimeout,

    /// Zero-byte read: the client closed its side.
    #[error("peer closed the connection")]
    PeerClosed,

    /// Any other read or write error.
    #[error("I/O failure: {0}")]
    IoFailure(#[from] io::Error),

    /// The requested display name was refused.
    #[error("name rejected: {0}")]
    ProtocolRejection(#[from] NameError),
}

impl SessionError {
    /// Whether the operation can simply be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientIoTimeout)
    }

    /// The line owed to the client before the connection is dropped.
    ///
    /// Only a refused name gets one; I/O error details never reach the peer.
    pub fn client_notice(&self) -> Option<String> {
        match self {
            Self::ProtocolRejection(reason) => Some(reason.rejection_line()),
            _ => None,
        }
    }
}

/// Server-level errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be created. Fatal.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// A single accept call failed. Logged, the accept loop continues.
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
