//! Configuration parsing for the gateway client.
//!
//! Settings are read from a single JSON config file. The top-level structure
//! contains logging metadata and a `gateway` block with credentials, the
//! gateway URL, and transport tuning.
//!
//! # Example config
//!
//! ```json
//! {
//!   "logging": { "module_name": "akc", "log_path": "/tmp/log" },
//!   "gateway": {
//!     "app_id": "my-app",
//!     "app_secret": "...",
//!     "gateway_url": "https://openapi.aikucun.com/route/rest",
//!     "transport": { "connect_timeout_secs": 5, "accept_invalid_certs": true }
//!   }
//! }
//! ```

use std::fmt;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::error::CoreError;

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Logging metadata (module name, log path).
    #[serde(default)]
    pub logging: Option<LoggingMeta>,

    /// Gateway credentials and transport settings.
    pub gateway: GatewayConfig,
}

/// Logging metadata block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingMeta {
    pub module_name: Option<String>,
    pub log_path: Option<String>,
}

/// Credentials and endpoint of the gateway.
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// Application ID issued by the platform.
    pub app_id: String,

    /// Shared secret. Only ever used as digest input.
    pub app_secret: String,

    /// Full gateway URL; the signed query string is appended after `?`.
    pub gateway_url: String,

    /// HTTP transport settings.
    #[serde(default)]
    pub transport: TransportConfig,
}

impl GatewayConfig {
    /// Check that credentials are present and the URL is an absolute
    /// `http`/`https` URL.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.app_id.is_empty() {
            return Err(CoreError::Missing("app_id"));
        }
        if self.app_secret.is_empty() {
            return Err(CoreError::Missing("app_secret"));
        }
        validate_gateway_url(&self.gateway_url)?;
        self.transport.validate()
    }
}

/// Check that `gateway_url` is an absolute `http`/`https` URL without a
/// query string (the signed query is appended after `?`).
pub fn validate_gateway_url(gateway_url: &str) -> Result<(), CoreError> {
    if gateway_url.is_empty() {
        return Err(CoreError::Missing("gateway_url"));
    }
    let url = url::Url::parse(gateway_url).map_err(|e| CoreError::Invalid {
        field: "gateway_url",
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CoreError::Invalid {
            field: "gateway_url",
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.query().is_some() {
        return Err(CoreError::Invalid {
            field: "gateway_url",
            reason: "must not carry a query string".into(),
        });
    }
    Ok(())
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("gateway_url", &self.gateway_url)
            .field("transport", &self.transport)
            .finish()
    }
}

/// HTTP transport settings.
///
/// Defaults match the platform's reference client, including
/// `accept_invalid_certs = true`. That default skips TLS certificate
/// validation and should be turned off wherever the gateway presents a
/// valid certificate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransportConfig {
    /// TCP connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// TCP keep-alive interval in seconds.
    #[serde(default = "default_tcp_keepalive")]
    pub tcp_keepalive_secs: u64,

    /// Upper bound on concurrent connections to the gateway host.
    #[serde(default = "default_max_connections")]
    pub max_connections_per_host: usize,

    /// Upper bound on idle pooled connections per host.
    #[serde(default = "default_max_idle")]
    pub max_idle_per_host: usize,

    /// Idle pooled connections are closed after this many seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Skip TLS certificate validation.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,

    /// Optional timeout for a whole request (connect + send + read), seconds.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl TransportConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn tcp_keepalive(&self) -> Duration {
        Duration::from_secs(self.tcp_keepalive_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.max_connections_per_host == 0 {
            return Err(CoreError::Invalid {
                field: "transport.max_connections_per_host",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            tcp_keepalive_secs: default_tcp_keepalive(),
            max_connections_per_host: default_max_connections(),
            max_idle_per_host: default_max_idle(),
            idle_timeout_secs: default_idle_timeout(),
            accept_invalid_certs: default_accept_invalid_certs(),
            request_timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults (used by serde)
// ---------------------------------------------------------------------------

fn default_connect_timeout() -> u64 {
    5
}

fn default_tcp_keepalive() -> u64 {
    30
}

fn default_max_connections() -> usize {
    200
}

fn default_max_idle() -> usize {
    30
}

fn default_idle_timeout() -> u64 {
    30
}

fn default_accept_invalid_certs() -> bool {
    true
}

/// Load and parse a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: AppConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config.gateway.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(url: &str) -> GatewayConfig {
        GatewayConfig {
            app_id: "app".into(),
            app_secret: "secret".into(),
            gateway_url: url.into(),
            transport: TransportConfig::default(),
        }
    }

    #[test]
    fn transport_defaults_apply() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{"gateway":{"app_id":"a","app_secret":"s","gateway_url":"https://gw.example.com/rest"}}"#,
        )
        .unwrap();
        let t = &cfg.gateway.transport;
        assert_eq!(t.connect_timeout(), Duration::from_secs(5));
        assert_eq!(t.tcp_keepalive(), Duration::from_secs(30));
        assert_eq!(t.max_connections_per_host, 200);
        assert_eq!(t.max_idle_per_host, 30);
        assert_eq!(t.idle_timeout(), Duration::from_secs(30));
        assert!(t.accept_invalid_certs);
        assert_eq!(t.request_timeout(), None);
        assert!(cfg.logging.is_none());
    }

    #[test]
    fn transport_overrides_parse() {
        let t: TransportConfig =
            serde_json::from_str(r#"{"accept_invalid_certs":false,"request_timeout_secs":10}"#)
                .unwrap();
        assert!(!t.accept_invalid_certs);
        assert_eq!(t.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(t.connect_timeout_secs, 5);
    }

    #[test]
    fn validate_rejects_bad_gateways() {
        assert!(gateway("https://gw.example.com/rest").validate().is_ok());
        assert!(matches!(
            gateway("ftp://gw.example.com").validate(),
            Err(CoreError::Invalid { field: "gateway_url", .. })
        ));
        assert!(gateway("not a url").validate().is_err());
        assert!(gateway("https://gw.example.com/rest?x=1").validate().is_err());

        let mut cfg = gateway("https://gw.example.com");
        cfg.app_secret.clear();
        assert!(matches!(cfg.validate(), Err(CoreError::Missing("app_secret"))));
    }

    #[test]
    fn gateway_url_check_stands_alone() {
        assert!(validate_gateway_url("http://127.0.0.1:8080/route/rest").is_ok());
        assert!(matches!(validate_gateway_url(""), Err(CoreError::Missing("gateway_url"))));
        let err = validate_gateway_url("https://gw.example.com/rest?x=1").unwrap_err();
        assert!(err.to_string().contains("query string"));
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", gateway("https://gw.example.com"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("secret\""));
    }
}
