//! Logger setup shared by the server and the client.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise `bin_name` (with `-` replaced by `_`,
/// matching the crate target) and the `tower_http` layer log at `default_level`,
/// everything else at `warn`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(bin_name, default_level)));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();
}

fn default_directive(bin_name: &str, default_level: &str) -> String {
    let target = bin_name.replace('-', "_");
    format!("{target}={default_level},tower_http={default_level},warn")
}
