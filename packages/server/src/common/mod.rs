//! Utilities shared across layers.

pub mod time;
