//! Typed error definitions shared across the workspace.
//!
//! [`CoreError`] covers failures that happen before any request is made
//! (config parsing and validation). Request-level failures live in
//! `akc_api::ApiError`. All variants implement `std::error::Error` via
//! `thiserror`, so they integrate with `anyhow::Result`.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required configuration value is missing or empty.
    #[error("config error: missing {0}")]
    Missing(&'static str),

    /// A configuration value is present but unusable.
    #[error("config error: invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
