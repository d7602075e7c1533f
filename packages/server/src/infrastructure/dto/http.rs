//! HTTP API response DTOs for the relay.

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

/// Connection list for the introspection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionListDto {
    pub count: usize,
    pub connections: Vec<ConnectionDetailDto>,
}

/// One registered connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDetailDto {
    pub id: String,
    pub addr: String,
    pub connected_at: String, // RFC 3339
}
