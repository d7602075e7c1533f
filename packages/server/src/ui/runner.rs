//! Router construction and the server loop.

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::ServerConfig,
    error::ServerError,
    ui::{
        handler::{health_check, list_connections, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Build the application router.
///
/// WebSocket upgrades are accepted on `/` and `/ws`; the plain HTTP routes
/// live under `/api`. Any origin may call the HTTP surface.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(websocket_handler))
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/connections", get(list_connections))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured port and serve until Ctrl-C / SIGTERM.
///
/// # Errors
///
/// Returns `ServerError::Bind` if the port cannot be bound.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    serve(listener, AppState::from_config(&config), shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    tracing::info!("WebSocket server running on {}", local_addr);

    let app = build_router(Arc::new(state));
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
