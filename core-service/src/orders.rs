//! Order endpoints on the warehouse backend

use crate::error::Result;
use crate::SortOrder;
use core_gateway::{Gateway, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filters for the order list. Unset fields are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub customer_phone: Option<String>,
}

impl OrderQuery {
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub model_number: String,
    pub item_id: i64,
    pub quantity: i64,
    pub price_per_piece: f64,
    pub subtotal: f64,
    pub source_warehouse: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_phone: String,
    pub operator_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_remark: Option<String>,
    pub total_amount: f64,
    pub items: Vec<NewOrderItem>,
}

/// Partial update of an order header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch_status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemChange {
    pub quantity: i64,
    pub price_per_piece: f64,
    pub subtotal: f64,
}

#[derive(Debug, Clone)]
pub struct OrdersApi {
    gateway: Gateway,
}

impl OrdersApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn create(&self, order: &NewOrder) -> Result<Value> {
        let options = RequestOptions::new().json(order)?;
        Ok(self.gateway.post("/orders", options).await?)
    }

    pub async fn list(&self, query: &OrderQuery) -> Result<Value> {
        let options = RequestOptions::new().query(query)?;
        Ok(self.gateway.get("/orders", options).await?)
    }

    pub async fn detail(&self, id: i64) -> Result<Value> {
        Ok(self
            .gateway
            .get(&format!("/orders/{}", id), RequestOptions::new())
            .await?)
    }

    pub async fn update(&self, id: i64, change: &OrderChange) -> Result<Value> {
        let options = RequestOptions::new().json(change)?;
        Ok(self.gateway.put(&format!("/orders/{}", id), options).await?)
    }

    /// Hand the order over to the delivery service.
    pub async fn update_dispatch_status(&self, id: i64) -> Result<Value> {
        Ok(self
            .gateway
            .put(&format!("/orders/{}/dispatch_status", id), RequestOptions::new())
            .await?)
    }

    pub async fn update_item(&self, item_id: i64, change: &OrderItemChange) -> Result<Value> {
        let options = RequestOptions::new().json(change)?;
        Ok(self
            .gateway
            .put(&format!("/orders/items/{}", item_id), options)
            .await?)
    }

    /// Append a line to an existing order. The line shape is owned by the backend.
    pub async fn add_item<T: Serialize + ?Sized>(&self, order_id: i64, item: &T) -> Result<Value> {
        let options = RequestOptions::new().json(item)?;
        Ok(self
            .gateway
            .post(&format!("/orders/{}/items", order_id), options)
            .await?)
    }

    pub async fn delete_item(&self, item_id: i64) -> Result<Value> {
        Ok(self
            .gateway
            .delete(&format!("/orders/items/{}", item_id), RequestOptions::new())
            .await?)
    }

    pub async fn delete(&self, id: i64) -> Result<Value> {
        Ok(self
            .gateway
            .delete(&format!("/orders/{}", id), RequestOptions::new())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_query_skips_unset_fields() {
        let query = OrderQuery {
            customer_phone: Some("13800000000".to_string()),
            order: Some(SortOrder::Desc),
            ..OrderQuery::page(2, 10)
        };

        let options = RequestOptions::new().query(&query).unwrap();
        let mut pairs = options.query;
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("customer_phone".to_string(), "13800000000".to_string()),
                ("order".to_string(), "desc".to_string()),
                ("page".to_string(), "2".to_string()),
                ("size".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_order_change_omits_unset_fields() {
        let change = OrderChange {
            dispatch_status: Some(1),
            ..OrderChange::default()
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json, serde_json::json!({ "dispatch_status": 1 }));
    }
}
