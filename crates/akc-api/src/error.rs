//! Request-level error type.
//!
//! Every gateway call returns `Result<T, ApiError>`. Failures are terminal
//! for the call: nothing is retried.

use thiserror::Error;

/// Errors produced by a gateway call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, DNS, TLS, or malformed-HTTP failure from the transport.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The client configuration is incomplete or invalid.
    #[error(transparent)]
    Config(#[from] akc_core::error::CoreError),

    /// The request could not be assembled (bad URL or method).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body is not a valid envelope.
    #[error("malformed response envelope: {0}")]
    EnvelopeDecode(#[source] serde_json::Error),

    /// The envelope decoded but reported `success = false`.
    #[error("code:{code},{message}")]
    Rejected { code: String, message: String },

    /// The envelope succeeded but `data` does not match the expected shape.
    #[error("failed to decode {interface} payload: {source}")]
    Decode {
        interface: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Returns `(code, message)` for business rejections.
    pub fn rejection(&self) -> Option<(&str, &str)> {
        match self {
            Self::Rejected { code, message } => Some((code, message)),
            _ => None,
        }
    }

    /// Returns `true` for a business rejection whose message contains `needle`.
    ///
    /// The gateway distinguishes rejections only by message text, e.g.
    /// `"已经注册过"` for a distributor that is already registered.
    pub fn is_rejection_containing(&self, needle: &str) -> bool {
        self.rejection()
            .is_some_and(|(_, message)| message.contains(needle))
    }
}
