//! Core domain models for the relay.

use std::net::SocketAddr;

use super::value_object::{ConnectionId, Timestamp};

/// Represents one connected peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Connection identifier
    pub id: ConnectionId,
    /// Remote address of the peer
    pub addr: SocketAddr,
    /// Timestamp when the upgrade handshake completed
    pub connected_at: Timestamp,
}

impl Connection {
    /// Create a new connection with a freshly generated id
    pub fn new(addr: SocketAddr, connected_at: Timestamp) -> Self {
        Self {
            id: ConnectionId::generate(),
            addr,
            connected_at,
        }
    }
}
