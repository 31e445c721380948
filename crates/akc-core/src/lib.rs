//! # akc-core
//!
//! Core crate for the Aikucun gateway client, providing:
//!
//! - **Types** (`types`) — order, order-page and settlement payloads
//! - **Configuration** (`config`) — JSON config deserialization and validation
//! - **Error types** (`error`) — configuration errors via thiserror
//! - **Time utilities** (`time_util`) — injectable clock and nonce formatting
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod error;
pub mod logging;
pub mod time_util;
pub mod types;

// Re-export types at crate root for convenience.
pub use types::*;
