//! WebSocket broadcast relay server.
//!
//! Receives messages from clients and relays them to every connected client.
//!
//! Run with:
//! ```not_rust
//! PORT=8080 cargo run --bin yamabiko-server
//! ```

use clap::Parser;
use yamabiko_server::{ServerConfig, config::load_env_file};
use yamabiko_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Read .env before anything consults the environment
    let env_file = load_env_file(None);

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    match env_file {
        Ok(Some(path)) => tracing::info!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }

    let config = ServerConfig::parse();

    // Run the server
    if let Err(e) = yamabiko_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
