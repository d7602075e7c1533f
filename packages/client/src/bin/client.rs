//! CLI client for the Yamabiko relay.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin yamabiko-client -- --url ws://127.0.0.1:8080/ws
//! ```

use clap::Parser;
use yamabiko_shared::logger::setup_logger;

/// Connect to a Yamabiko relay and chat from the terminal
#[derive(Debug, Parser)]
#[command(name = "yamabiko-client", version, about)]
struct Args {
    /// WebSocket URL of the relay
    #[arg(short, long, env = "YAMABIKO_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = yamabiko_client::run_client(&args.url).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
