//! HTTP transport seam.
//!
//! [`Transport`] executes one signed request and returns the raw response
//! body. [`HttpTransport`] is the reqwest-backed default; tests and callers
//! with their own HTTP stack supply another implementation.
//!
//! The HTTP status code is not interpreted here: the gateway reports
//! failures inside the response envelope, and a non-JSON error page fails
//! envelope decoding instead.

use akc_core::config::TransportConfig;
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{CONNECTION, CONTENT_TYPE};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::error::ApiError;

/// A fully signed request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    pub method: Method,
    /// Gateway URL with the signed query string appended.
    pub url: String,
    /// JSON payload, sent as `application/json`.
    pub body: Option<Vec<u8>>,
}

/// Executes gateway requests.
///
/// Implementations must be safe to call from multiple tasks at once.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the complete response body.
    async fn execute(&self, request: GatewayRequest) -> Result<Vec<u8>, ApiError>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// reqwest-backed transport.
///
/// Every request asks the server to close the connection afterwards. The
/// number of concurrent requests is capped at
/// [`TransportConfig::max_connections_per_host`].
pub struct HttpTransport {
    http: reqwest::Client,
    permits: Semaphore,
}

impl HttpTransport {
    /// Build a transport from `config`.
    ///
    /// With the default config, TLS certificates are **not** verified.
    pub fn new(config: &TransportConfig) -> Result<Self, ApiError> {
        if config.accept_invalid_certs {
            warn!("[transport] TLS certificate validation disabled");
        }

        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .tcp_keepalive(config.tcp_keepalive())
            .pool_max_idle_per_host(config.max_idle_per_host)
            .pool_idle_timeout(config.idle_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            permits: Semaphore::new(config.max_connections_per_host.max(1)),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: GatewayRequest) -> Result<Vec<u8>, ApiError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ApiError::InvalidRequest("transport is shut down".into()))?;

        let mut builder = self
            .http
            .request(request.method, &request.url)
            .header(CONNECTION, "close");
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        debug!(%status, len = bytes.len(), "[transport] response received");

        Ok(bytes.to_vec())
    }
}
