//! Shared test fixtures: an in-process relay on an ephemeral port.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use futures_util::StreamExt;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle, time::timeout};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};
use yamabiko_server::{ServerConfig, ServerError, serve, ui::state::AppState};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub const TIMEOUT: Duration = Duration::from_secs(3);

pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    /// Start a relay with the default configuration.
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    /// Start a relay with a custom configuration; host/port are ignored.
    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let state = AppState::from_config(&config);
        let handle = tokio::spawn(async move {
            serve(listener, state, async move {
                let _ = shutdown_rx.await;
            })
            .await
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Open a WebSocket connection to the relay.
    pub async fn connect(&self) -> WsStream {
        let (ws, _) = timeout(TIMEOUT, connect_async(self.ws_url()))
            .await
            .expect("timeout connecting")
            .expect("Failed to connect");
        ws
    }

    /// Fetch the `/api/connections` body.
    pub async fn connections(&self) -> serde_json::Value {
        reqwest::get(format!("{}/api/connections", self.base_url()))
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON")
    }

    /// Number of connections currently in the registry.
    pub async fn connection_count(&self) -> usize {
        self.connections().await["count"]
            .as_u64()
            .expect("count should be a number") as usize
    }

    /// Registration happens after the handshake, so poll until it settles.
    pub async fn wait_for_count(&self, expected: usize) {
        let result = timeout(TIMEOUT, async {
            loop {
                if self.connection_count().await == expected {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(
            result.is_ok(),
            "registry size never reached {expected} (last: {})",
            self.connection_count().await
        );
    }

    /// Stop the server and wait for it to exit.
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.handle).await.expect("server task panicked")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Next data frame (text or binary), skipping control frames.
pub async fn next_data(ws: &mut WsStream) -> Message {
    loop {
        let msg = timeout(TIMEOUT, ws.next())
            .await
            .expect("timeout waiting for message")
            .expect("stream closed")
            .expect("ws error");
        match msg {
            Message::Text(_) | Message::Binary(_) => return msg,
            Message::Close(frame) => panic!("unexpected close: {frame:?}"),
            _ => continue,
        }
    }
}

/// Assert that no data frame arrives within `wait`.
pub async fn assert_silent(ws: &mut WsStream, wait: Duration) {
    if let Ok(Some(Ok(msg))) = timeout(wait, ws.next()).await {
        assert!(
            !matches!(msg, Message::Text(_) | Message::Binary(_)),
            "unexpected message: {msg:?}"
        );
    }
}
