//! Seller order structures returned by `aikucun.order.seller.order.list`.
//!
//! An [`Order`] is the seller-side ("second party") order; each carries the
//! buyer-side ("third party") line items in [`Order::three_order_list`].

use serde::{Deserialize, Serialize};

use super::null_as_default;

// ---------------------------------------------------------------------------
// Line item (third-party order)
// ---------------------------------------------------------------------------

/// A single line item of a seller order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderItem {
    pub order_no: String,
    pub order_detail_no: String,
    pub order_detail_id: String,
    pub product_id: String,
    pub sku_id: String,
    pub product_name: String,
    pub barcode: String,
    pub model_no: String,
    /// After-sale state code as reported by the gateway.
    pub after_sale_status: i32,
    /// Payment state code as reported by the gateway.
    pub pay_status: i32,
    /// Amount paid for this line item.
    pub three_order_payment_amount: f64,
}

// ---------------------------------------------------------------------------
// Seller order (second-party order)
// ---------------------------------------------------------------------------

/// A seller order with its line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Order {
    pub shop_no: i64,
    pub seller_id: String,
    pub order_no: String,
    pub brand_id: String,
    pub brand_url: String,
    pub brand_name: String,
    pub payment_amount: f64,
    pub order_status: i32,
    pub order_channel: String,
    pub order_source: String,
    pub total_commission: f64,
    /// Order time as the gateway formats it (`yyyy-MM-dd HH:mm:ss`).
    pub order_time: String,
    pub freight: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub three_order_list: Vec<OrderItem>,
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One page of seller orders plus pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderPage {
    /// 1-based page index.
    pub page_index: u32,
    pub page_size: u32,
    pub start_row: u32,
    pub end_row: u32,
    /// Total number of orders matching the query.
    pub total: u64,
    /// Total number of pages.
    pub pages: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub result: Vec<Order>,
}
