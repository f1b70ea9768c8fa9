//! After-sales cases on the warehouse backend

use crate::error::Result;
use core_gateway::{Gateway, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Per-line adjustment of an after-sales case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AftersaleItem {
    pub order_item_id: i64,
    pub quantity_change: i64,
    pub amount_change: f64,
}

/// `aftersale_type`: 1 over-delivered (refund), 2 under-delivered (top-up).
/// `aftersale_status`: 1 open, 2 resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAftersale {
    pub order_id: i64,
    pub aftersale_type: i32,
    pub aftersale_status: i32,
    pub items: Vec<AftersaleItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_result: Option<String>,
    pub aftersale_operator: i64,
}

#[derive(Debug, Clone)]
pub struct AftersalesApi {
    gateway: Gateway,
}

impl AftersalesApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn create(&self, case: &NewAftersale) -> Result<Value> {
        let options = RequestOptions::new().json(case)?;
        Ok(self.gateway.post("/aftersales", options).await?)
    }

    /// Cases raised against one order.
    pub async fn for_order(&self, order_id: i64) -> Result<Value> {
        Ok(self
            .gateway
            .get(&format!("/aftersales/order/{}", order_id), RequestOptions::new())
            .await?)
    }

    pub async fn update_status(&self, aftersale_id: i64, status: i32) -> Result<Value> {
        let options = RequestOptions::new().body(json!({ "status": status }));
        Ok(self
            .gateway
            .put(&format!("/aftersales/{}/status", aftersale_id), options)
            .await?)
    }
}
