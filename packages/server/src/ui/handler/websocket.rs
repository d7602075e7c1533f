//! WebSocket connection handlers.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};

use crate::{
    common::time::now_timestamp,
    domain::{Connection, Payload, outbound},
    ui::state::AppState,
    usecase::{ConnectPeerUseCase, DisconnectPeerUseCase, RelayMessageUseCase},
};

/// How long an evicted peer gets to accept its close frame.
const CLOSE_FRAME_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, StatusCode> {
    // Reject before the handshake when the relay is full
    let connect_usecase = ConnectPeerUseCase::new(state.registry.clone(), state.max_connections);
    if let Err(e) = connect_usecase.check_capacity().await {
        tracing::warn!("Rejecting connection from {}: {}", addr, e);
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(ws
        .on_failed_upgrade(move |e| {
            tracing::warn!("WebSocket upgrade from {} failed: {}", addr, e);
        })
        .on_upgrade(move |socket| handle_socket(socket, state, addr)))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, addr: SocketAddr) {
    let connection = Connection::new(addr, now_timestamp());
    let id = connection.id;
    let (outbound, mut outbound_rx) = outbound::channel(state.send_queue_capacity);

    let connect_usecase = ConnectPeerUseCase::new(state.registry.clone(), state.max_connections);
    match connect_usecase.execute(connection, outbound.clone()).await {
        Ok(total) => {
            tracing::info!("New client connected from {} (id: '{}')", addr, id);
            tracing::info!("Total connected clients: {}", total);
        }
        Err(e) => {
            // Lost the race against other connections for the last slot
            tracing::warn!("Failed to register client from {}: {}", addr, e);
            let close = Message::Close(Some(CloseFrame {
                code: close_code::AGAIN,
                reason: "relay is full".into(),
            }));
            if let Err(e) = socket.send(close).await {
                tracing::debug!("Failed to send close frame to {}: {}", addr, e);
            }
            return;
        }
    }

    let (mut sender, mut receiver) = socket.split();

    // Spawn a task to receive messages from this client and relay them
    let relay_usecase = RelayMessageUseCase::new(state.registry.clone(), state.policy);
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error from {}: {}", addr, e);
                    break;
                }
            };

            let payload = match msg {
                Message::Text(text) => Payload::Text(text.as_str().to_owned()),
                Message::Binary(bytes) => Payload::Binary(bytes.to_vec()),
                Message::Ping(_) | Message::Pong(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    continue;
                }
                Message::Close(_) => {
                    tracing::info!("Client {} requested close", addr);
                    break;
                }
            };

            tracing::info!(
                "Received {} message from {} ({} bytes)",
                payload.kind(),
                addr,
                payload.len()
            );
            if let Payload::Text(text) = &payload {
                tracing::debug!("Message from {}: {}", addr, text);
            }

            match relay_usecase.execute(&id, payload).await {
                Ok(report) => {
                    tracing::debug!(
                        "Relayed message from {} to {} clients (skipped: {}, dropped: {}, evicted: {})",
                        addr,
                        report.delivered.len(),
                        report.skipped,
                        report.dropped,
                        report.evicted.len()
                    );
                }
                Err(e) => {
                    tracing::warn!("Not relaying message from {}: {}", addr, e);
                }
            }
        }
    });

    // Spawn a task to forward relayed payloads to this client
    let writer_outbound = outbound.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let payload = tokio::select! {
                biased;
                _ = writer_outbound.closed() => break,
                payload = outbound_rx.recv() => match payload {
                    Some(payload) => payload,
                    None => return,
                },
            };
            let message = match payload {
                Payload::Text(text) => Message::Text(text.into()),
                Payload::Binary(bytes) => Message::Binary(bytes.into()),
            };

            // A peer that stopped reading blocks here; eviction must still win
            tokio::select! {
                biased;
                _ = writer_outbound.closed() => break,
                result = sender.send(message) => {
                    if let Err(e) = result {
                        tracing::error!("WebSocket error from {}: {}", addr, e);
                        return;
                    }
                }
            }
        }

        // Evicted as a slow peer; queued payloads are discarded
        let close = Message::Close(Some(CloseFrame {
            code: close_code::POLICY,
            reason: "send queue overflow".into(),
        }));
        match tokio::time::timeout(CLOSE_FRAME_TIMEOUT, sender.send(close)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!("Failed to send close frame to {}: {}", addr, e);
            }
            Err(_) => {
                tracing::debug!("Timed out sending close frame to {}", addr);
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Stop fan-out to this connection before it leaves the registry, so a
    // broadcast holding an older snapshot cannot reach it either.
    outbound.close();

    let disconnect_usecase = DisconnectPeerUseCase::new(state.registry.clone());
    match disconnect_usecase.execute(&id).await {
        Ok((connection, remaining)) => {
            tracing::info!("Client disconnected from {}", connection.addr);
            tracing::info!("Total connected clients: {}", remaining);
        }
        Err(e) => {
            tracing::warn!("Failed to disconnect client from {}: {}", addr, e);
        }
    }
}
