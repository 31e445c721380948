//! Settlement record returned by `aikucun.settle.shop.income.detail`.

use serde::{Deserialize, Serialize};

/// Income and settlement state of a single seller order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettlementInfo {
    /// Income credited to the shop for the order.
    pub income_amount: f64,
    /// Settlement date. Snake-case on the wire, unlike every other field.
    #[serde(rename = "settle_date")]
    pub settle_date: String,
    pub settle_status: String,
}
