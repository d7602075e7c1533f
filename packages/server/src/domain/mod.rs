//! Domain layer for the relay.
//!
//! This module contains the relay's core model (connections, payloads and the
//! registry abstraction) independent of HTTP/WebSocket and storage concerns.

pub mod entity;
pub mod error;
pub mod outbound;
pub mod repository;
pub mod value_object;

pub use entity::Connection;
pub use error::{DeliveryError, RegistryError};
pub use outbound::{Outbound, OutboundReceiver};
pub use repository::ConnectionRegistry;
pub use value_object::{ConnectionId, Payload, Timestamp};
