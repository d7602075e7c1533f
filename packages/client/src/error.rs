//! Client error definitions.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors that end a client session
#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay could not be reached or refused the handshake
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    /// The connection failed after the handshake
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// The line editor could not be initialized
    #[error("failed to initialize line editor: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
