//! WebSocket broadcast relay.
//!
//! Every message a client sends is relayed verbatim to the connected clients.
//! The crate is layered the same way throughout:
//!
//! - [`domain`]: connections, payloads, the registry abstraction
//! - [`usecase`]: connect, disconnect and relay operations
//! - [`infrastructure`]: the in-memory registry and HTTP DTOs
//! - [`ui`]: axum handlers, router and server runner

pub mod common;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{run, serve};
