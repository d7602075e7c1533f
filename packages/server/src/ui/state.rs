//! Server state shared by the handlers.

use std::sync::Arc;

use crate::{
    config::ServerConfig,
    domain::ConnectionRegistry,
    infrastructure::registry::InMemoryConnectionRegistry,
    usecase::RelayPolicy,
};

/// Shared application state
pub struct AppState {
    /// Registry of open connections (the only shared mutable state)
    pub registry: Arc<dyn ConnectionRegistry>,
    /// Broadcast settings
    pub policy: RelayPolicy,
    /// Connection limit checked before the upgrade handshake
    pub max_connections: Option<usize>,
    /// Per-connection send queue bound
    pub send_queue_capacity: Option<usize>,
}

impl AppState {
    /// Build the state with an in-memory registry.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            registry: Arc::new(InMemoryConnectionRegistry::with_capacity(
                config.max_connections,
            )),
            policy: config.relay_policy(),
            max_connections: config.max_connections,
            send_queue_capacity: config.send_queue_capacity,
        }
    }
}
