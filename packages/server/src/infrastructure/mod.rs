//! Infrastructure layer.
//!
//! Concrete registry implementations and the DTOs exposed over HTTP.

pub mod dto;
pub mod registry;
