//! Shared utilities for Yamabiko binaries.

pub mod logger;
