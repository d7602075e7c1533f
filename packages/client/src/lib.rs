//! CLI client for the Yamabiko relay.
//!
//! Connects to a relay, prints every frame it receives and sends each line
//! typed on stdin as a text frame. `/quit` (or Ctrl-D / Ctrl-C) leaves.

pub mod error;
pub mod session;

pub use error::ClientError;
pub use session::run_client;
