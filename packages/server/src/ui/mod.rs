//! HTTP/WebSocket surface of the relay.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{build_router, run, serve};
pub use signal::shutdown_signal;
