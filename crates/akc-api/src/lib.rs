//! # akc-api
//!
//! Signed HTTP client for the Aikucun open gateway.
//!
//! Every call goes through the same pipeline:
//!
//! ```text
//! params/body ─► Signer ─► Transport ─► Envelope ─► typed result
//!                (sign)     (HTTP)      (success?)   (decode data)
//! ```
//!
//! [`GatewayClient`] implements [`SellerApi`], which exposes the supported
//! operations. Failures are reported as [`ApiError`]; nothing is retried.
//!
//! ```ignore
//! use akc_api::{Credentials, GatewayClient, SellerApi};
//!
//! let client = GatewayClient::new(
//!     Credentials::new("app-id", "app-secret"),
//!     "https://openapi.aikucun.com/route/rest",
//!     None,
//! )?;
//! let page = client.list_orders(1, 20, "2024-01-01 00:00:00", "2024-01-31 23:59:59").await?;
//! ```

pub mod client;
pub mod envelope;
pub mod error;
pub mod sign;
pub mod transport;

use akc_core::{OrderPage, SettlementInfo};
use async_trait::async_trait;

pub use client::GatewayClient;
pub use envelope::Envelope;
pub use error::ApiError;
pub use sign::{Credentials, SignedRequest, Signer};
pub use transport::{GatewayRequest, HttpTransport, Transport};

/// Seller-side operations of the gateway.
///
/// All methods take `&self` so they can be called concurrently from
/// multiple tasks. Each call signs a fresh request; nothing is cached.
#[async_trait]
pub trait SellerApi: Send + Sync {
    /// Fetch a one-time auto-login URL for the member with `phone`.
    async fn auto_login_url(&self, phone: &str) -> Result<String, ApiError>;

    /// Register `phone` as a distributor.
    ///
    /// Returns the distributor ID. A phone that is already registered is
    /// reported as [`ApiError::Rejected`]; inspect the message to tell it
    /// apart from other rejections.
    async fn register_distributor(&self, phone: &str, name: &str) -> Result<String, ApiError>;

    /// List seller orders created between `begin_time` and `end_time`
    /// (`yyyy-MM-dd HH:mm:ss`). `page` is 1-based.
    async fn list_orders(
        &self,
        page: u32,
        page_size: u32,
        begin_time: &str,
        end_time: &str,
    ) -> Result<OrderPage, ApiError>;

    /// Look up the settlement record of a seller order.
    async fn order_settle_info(&self, order_no: &str) -> Result<SettlementInfo, ApiError>;
}
