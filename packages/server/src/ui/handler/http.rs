//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    common::time::timestamp_to_rfc3339,
    infrastructure::dto::http::{ConnectionDetailDto, ConnectionListDto, HealthDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// List the connections currently in the registry
pub async fn list_connections(State(state): State<Arc<AppState>>) -> Json<ConnectionListDto> {
    let mut connections = state.registry.connections().await;

    // Sort by connect time for consistent ordering
    connections.sort_by(|a, b| {
        a.connected_at
            .cmp(&b.connected_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let connections: Vec<ConnectionDetailDto> = connections
        .into_iter()
        .map(|c| ConnectionDetailDto {
            id: c.id.to_string(),
            addr: c.addr.to_string(),
            connected_at: timestamp_to_rfc3339(c.connected_at.value()),
        })
        .collect();

    Json(ConnectionListDto {
        count: connections.len(),
        connections,
    })
}
