//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Errors related to the connection registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Registry capacity exceeded error
    #[error("Registry capacity exceeded: maximum {capacity} connections allowed (current: {current})")]
    CapacityExceeded { capacity: usize, current: usize },

    /// The same connection was inserted twice
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(ConnectionId),

    /// The connection is not (or no longer) registered
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(ConnectionId),
}

/// Errors returned when handing a payload to a connection's outbound queue
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The connection is closed or its writer has gone away
    #[error("connection is closed")]
    Closed,

    /// The bounded send queue is full (slow peer)
    #[error("send queue is full")]
    Full,
}
