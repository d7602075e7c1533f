//! Server-level error definitions.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors that stop the server process
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The listener failed while serving
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
