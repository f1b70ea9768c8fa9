//! Dispatch of warehouse orders to the delivery service

use crate::error::Result;
use crate::SortOrder;
use core_gateway::{Gateway, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filters for orders awaiting dispatch.
///
/// `status`: 1 awaiting dispatch, 2 awaiting pickup, 3 in transit, 4 done,
/// 5 cancelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub order_no: Option<String>,
    pub customer_phone: Option<String>,
    pub status: Option<i32>,
    pub driver_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    pub order_id: i64,
    pub order_no: String,
    pub customer_phone: String,
    pub delivery_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_note: Option<String>,
    pub goods_weight: f64,
    pub delivery_fee: f64,
}

/// Dispatch calls go through the warehouse backend, which forwards them.
#[derive(Debug, Clone)]
pub struct DeliveryApi {
    gateway: Gateway,
}

impl DeliveryApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn pending_orders(&self, query: &DeliveryQuery) -> Result<Value> {
        let options = RequestOptions::new().query(query)?;
        Ok(self.gateway.get("/orders", options).await?)
    }

    pub async fn dispatch(&self, request: &DispatchRequest) -> Result<Value> {
        let options = RequestOptions::new().json(request)?;
        Ok(self.gateway.post("/delivery/dispatch", options).await?)
    }

    pub async fn status(&self, order_id: i64) -> Result<Value> {
        Ok(self
            .gateway
            .get(&format!("/delivery/status/{}", order_id), RequestOptions::new())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_request_uses_camel_case() {
        let request = DispatchRequest {
            order_id: 1,
            order_no: "SO-1".to_string(),
            customer_phone: "138".to_string(),
            delivery_address: "Dock 4".to_string(),
            delivery_note: None,
            goods_weight: 120.0,
            delivery_fee: 30.0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["orderId"], 1);
        assert_eq!(json["goodsWeight"], 120.0);
        assert!(json.get("deliveryNote").is_none());
    }
}
