//! Gateway client: sign → send → unwrap envelope → decode.
//!
//! # Operations
//!
//! | Operation                | Method | Interface                                   |
//! |--------------------------|--------|---------------------------------------------|
//! | Auto-login URL           | POST   | `aikucun.member.open.third.login`           |
//! | Register distributor     | POST   | `aikucun.member.open.register.distributor`  |
//! | Seller order list        | POST   | `aikucun.order.seller.order.list`           |
//! | Order settlement info    | GET    | `aikucun.settle.shop.income.detail`         |

use std::fmt;
use std::sync::Arc;

use akc_core::config::{GatewayConfig, validate_gateway_url};
use akc_core::time_util::Clock;
use akc_core::{OrderPage, SettlementInfo};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::SellerApi;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::sign::{Credentials, Signer};
use crate::transport::{GatewayRequest, HttpTransport, Transport};

/// Interface names understood by the gateway.
pub mod interface {
    pub const THIRD_LOGIN: &str = "aikucun.member.open.third.login";
    pub const REGISTER_DISTRIBUTOR: &str = "aikucun.member.open.register.distributor";
    pub const SELLER_ORDER_LIST: &str = "aikucun.order.seller.order.list";
    pub const SHOP_INCOME_DETAIL: &str = "aikucun.settle.shop.income.detail";
}

/// `scene` value the gateway expects for third-party login.
const LOGIN_SCENE: u32 = 1;

// ---------------------------------------------------------------------------
// GatewayClient
// ---------------------------------------------------------------------------

/// Client for the Aikucun open gateway.
///
/// Holds no per-call state; share it across tasks by reference or `Arc`.
pub struct GatewayClient {
    signer: Signer,
    gateway_url: String,
    transport: Arc<dyn Transport>,
}

impl GatewayClient {
    /// Create a client.
    ///
    /// `gateway_url` must be an absolute `http`/`https` URL without a query
    /// string. When `transport` is `None`, an [`HttpTransport`] with default
    /// settings is built (which skips TLS certificate validation).
    pub fn new(
        credentials: Credentials,
        gateway_url: impl Into<String>,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<Self, ApiError> {
        let gateway_url = gateway_url.into();
        validate_gateway_url(&gateway_url)?;
        let transport: Arc<dyn Transport> = match transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&Default::default())?),
        };
        Ok(Self {
            signer: Signer::new(credentials),
            gateway_url,
            transport,
        })
    }

    /// Create a client from a validated config block.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.transport)?);
        Self::new(
            Credentials::new(&config.app_id, &config.app_secret),
            &config.gateway_url,
            Some(transport),
        )
    }

    /// Replace the time source used for `timestamp` and `noncestr`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.signer = self.signer.with_clock(clock);
        self
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    /// Sign, send, and parse the envelope of one call.
    async fn call(
        &self,
        interface: &'static str,
        method: Method,
        params: &[(&str, &str)],
        body: Option<&Map<String, Value>>,
    ) -> Result<Envelope, ApiError> {
        let signed = self.signer.sign(interface, params, body)?;
        let url = format!("{}?{}", self.gateway_url, signed.query);
        debug!(interface, %method, %url, "[gateway] sending request");

        let raw = self
            .transport
            .execute(GatewayRequest {
                method,
                url,
                body: signed.body,
            })
            .await?;

        let envelope = Envelope::from_slice(&raw)?;
        if !envelope.is_successful() {
            warn!(
                interface,
                code = %envelope.code,
                message = %envelope.message,
                "[gateway] request rejected"
            );
        }
        Ok(envelope)
    }
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("signer", &self.signer)
            .field("gateway_url", &self.gateway_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SellerApi for GatewayClient {
    async fn auto_login_url(&self, phone: &str) -> Result<String, ApiError> {
        let body = object(json!({ "phone": phone, "scene": LOGIN_SCENE }));
        let data = self
            .call(interface::THIRD_LOGIN, Method::POST, &[("accessToken", "")], Some(&body))
            .await?
            .into_data()?;

        Ok(match data {
            Value::String(url) => url,
            other => other.to_string(),
        })
    }

    async fn register_distributor(&self, phone: &str, name: &str) -> Result<String, ApiError> {
        let body = object(json!({ "phone": phone, "name": name }));
        let id: u64 = self
            .call(
                interface::REGISTER_DISTRIBUTOR,
                Method::POST,
                &[("accessToken", "")],
                Some(&body),
            )
            .await?
            .decode(interface::REGISTER_DISTRIBUTOR)?;
        Ok(id.to_string())
    }

    async fn list_orders(
        &self,
        page: u32,
        page_size: u32,
        begin_time: &str,
        end_time: &str,
    ) -> Result<OrderPage, ApiError> {
        let body = object(json!({
            "currentPage": page,
            "pageSize": page_size,
            "data": { "beginTime": begin_time, "endTime": end_time },
        }));
        self.call(
            interface::SELLER_ORDER_LIST,
            Method::POST,
            &[("accessToken", "")],
            Some(&body),
        )
        .await?
        .decode_object(interface::SELLER_ORDER_LIST)
    }

    async fn order_settle_info(&self, order_no: &str) -> Result<SettlementInfo, ApiError> {
        self.call(
            interface::SHOP_INCOME_DETAIL,
            Method::GET,
            &[("accessToken", ""), ("secondOrderNo", order_no)],
            None,
        )
        .await?
        .decode_object(interface::SHOP_INCOME_DETAIL)
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use akc_core::time_util::FixedClock;

    use super::*;

    const GATEWAY: &str = "https://gw.example.com/route/rest";

    /// Returns a canned response and records every request.
    struct StubTransport {
        response: Mutex<Option<Result<Vec<u8>, ApiError>>>,
        seen: Mutex<Vec<GatewayRequest>>,
    }

    impl StubTransport {
        fn replying(body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Some(Ok(body.as_bytes().to_vec()))),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: ApiError) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Some(Err(err))),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> GatewayRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn execute(&self, request: GatewayRequest) -> Result<Vec<u8>, ApiError> {
            self.seen.lock().unwrap().push(request);
            self.response.lock().unwrap().take().unwrap()
        }
    }

    fn client(transport: Arc<StubTransport>) -> GatewayClient {
        GatewayClient::new(
            Credentials::new("test-app", "test-secret"),
            GATEWAY,
            Some(transport as Arc<dyn Transport>),
        )
        .unwrap()
        .with_clock(Arc::new(FixedClock(1_700_000_000)))
    }

    fn body_json(req: &GatewayRequest) -> Value {
        serde_json::from_slice(req.body.as_deref().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn login_url_posts_signed_request() {
        let stub = StubTransport::replying(
            r#"{"code":"0","success":true,"message":"","data":"https://m.example.com/login?t=abc"}"#,
        );
        let url = client(stub.clone()).auto_login_url("13800000000").await.unwrap();
        assert_eq!(url, "https://m.example.com/login?t=abc");

        let req = stub.last();
        assert_eq!(req.method, Method::POST);
        assert_eq!(
            req.url,
            "https://gw.example.com/route/rest?accessToken=&appid=test-app&format=JSON\
             &interfaceName=aikucun.member.open.third.login&noncestr=221320\
             &sign=e3987c5080a6428c5a3971051a87a5c7e1980cbf&timestamp=1700000000&version=1"
        );
        assert_eq!(body_json(&req), json!({ "phone": "13800000000", "scene": 1 }));
    }

    #[tokio::test]
    async fn login_url_keeps_non_string_data_raw() {
        let stub = StubTransport::replying(r#"{"code":0,"success":true,"data":{"url":"x"}}"#);
        let url = client(stub).auto_login_url("13800000000").await.unwrap();
        assert_eq!(url, r#"{"url":"x"}"#);
    }

    #[tokio::test]
    async fn register_returns_numeric_id_as_string() {
        let stub = StubTransport::replying(r#"{"code":0,"success":true,"data":1234567890123}"#);
        let id = client(stub.clone())
            .register_distributor("13800000000", "测试")
            .await
            .unwrap();
        assert_eq!(id, "1234567890123");

        let req = stub.last();
        assert!(req.url.contains("interfaceName=aikucun.member.open.register.distributor"));
        assert_eq!(body_json(&req), json!({ "phone": "13800000000", "name": "测试" }));
    }

    #[tokio::test]
    async fn register_rejection_is_inspectable() {
        let stub = StubTransport::replying(
            r#"{"code":"40001","success":false,"message":"该手机号已经注册过","data":null}"#,
        );
        let err = client(stub)
            .register_distributor("13800000000", "测试")
            .await
            .unwrap_err();
        assert!(err.is_rejection_containing("已经注册过"));
        assert!(err.to_string().contains("40001"));
    }

    #[tokio::test]
    async fn register_with_non_numeric_id_fails() {
        let stub = StubTransport::replying(r#"{"code":0,"success":true,"data":"abc"}"#);
        let err = client(stub)
            .register_distributor("13800000000", "n")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Decode { interface: interface::REGISTER_DISTRIBUTOR, .. }
        ));
    }

    #[tokio::test]
    async fn list_orders_decodes_page() {
        let stub = StubTransport::replying(
            r#"{"code":200,"success":true,"message":"ok","data":{
                "pageIndex":1,"pageSize":20,"total":5,"pages":1,
                "result":[{"orderNo":"A100","shopNo":7,"threeOrderList":[
                    {"orderNo":"A100","orderDetailNo":"D1","productName":"Tee"}
                ]}]
            }}"#,
        );
        let page = client(stub.clone())
            .list_orders(1, 20, "2024-01-01 00:00:00", "2024-01-31 23:59:59")
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 1);
        assert_eq!(page.result.len(), 1);
        assert_eq!(page.result[0].three_order_list.len(), 1);
        assert_eq!(page.result[0].three_order_list[0].product_name, "Tee");

        let req = stub.last();
        assert_eq!(req.method, Method::POST);
        assert_eq!(
            body_json(&req),
            json!({
                "currentPage": 1,
                "pageSize": 20,
                "data": { "beginTime": "2024-01-01 00:00:00", "endTime": "2024-01-31 23:59:59" }
            })
        );
    }

    #[tokio::test]
    async fn list_orders_surfaces_decode_errors() {
        let stub = StubTransport::replying(r#"{"code":0,"success":true,"data":{"total":"many"}}"#);
        let err = client(stub).list_orders(1, 20, "a", "b").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn array_data_is_not_a_result() {
        let stub = StubTransport::replying(r#"{"code":0,"success":true,"data":[]}"#);
        let err = client(stub).list_orders(1, 20, "a", "b").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Decode { interface: interface::SELLER_ORDER_LIST, .. }
        ));

        let stub = StubTransport::replying(
            r#"{"code":0,"success":true,"data":[8.8,"2024-05-01","1"]}"#,
        );
        let err = client(stub).order_settle_info("A100").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Decode { interface: interface::SHOP_INCOME_DETAIL, .. }
        ));
    }

    #[tokio::test]
    async fn settle_info_is_a_get_without_body() {
        let stub = StubTransport::replying(
            r#"{"code":"0","success":true,"data":{"incomeAmount":8.8,"settle_date":"2024-05-01","settleStatus":"1"}}"#,
        );
        let info = client(stub.clone()).order_settle_info("A100").await.unwrap();
        assert_eq!(info.income_amount, 8.8);
        assert_eq!(info.settle_date, "2024-05-01");

        let req = stub.last();
        assert_eq!(req.method, Method::GET);
        assert!(req.body.is_none());
        assert!(req.url.contains("secondOrderNo=A100"));
        assert!(req.url.contains("sign=534ed8ca9d2fbf599d6d78626cab57471f5f19e2"));
        assert!(!req.url.contains("appsecret"));
        assert!(!req.url.contains("body="));
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let stub = StubTransport::failing(ApiError::InvalidRequest("connection refused".into()));
        let err = client(stub).order_settle_info("A100").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(ref m) if m == "connection refused"));
    }

    #[tokio::test]
    async fn non_json_response_is_envelope_error() {
        let stub = StubTransport::replying("<html>bad gateway</html>");
        let err = client(stub).order_settle_info("A100").await.unwrap_err();
        assert!(matches!(err, ApiError::EnvelopeDecode(_)));
    }

    #[test]
    fn from_config_rejects_missing_secret() {
        let config = GatewayConfig {
            app_id: "app".into(),
            app_secret: String::new(),
            gateway_url: GATEWAY.into(),
            transport: Default::default(),
        };
        let err = GatewayClient::from_config(&config).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn new_rejects_gateway_with_query() {
        let transport: Arc<dyn Transport> = StubTransport::replying("{}");
        let err = GatewayClient::new(
            Credentials::new("app", "secret"),
            "https://gw.example.com/route/rest?x=1",
            Some(transport),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ApiError::Config(_)));
        assert!(err.to_string().contains("query string"));
    }

    #[test]
    fn client_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GatewayClient>();
    }
}
